/// Builds a [`Value::Object`](crate::data::Value::Object) from `name => value` pairs.
///
/// ```
/// let user = rowview_core::object! {
///     "fullName" => "Ann",
///     "age" => 30_i64,
/// };
/// assert_eq!(user.as_object().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::data::Value::Object($crate::data::ValueObject::new())
    };
    (
        $( $name:expr => $value:expr ),+ $(,)?
    ) => {
        $crate::data::Value::Object(
            [ $( ($name.to_string(), $crate::data::Value::from($value)), )+ ]
                .into_iter()
                .collect::<$crate::data::ValueObject>()
        )
    };
}
