/// Builds a plain keyed record.
///
/// Each entry is `key => value`, where the key converts into a `String` and
/// the value into a [`Value`](crate::value::Value). The macro evaluates to an
/// [`Object`](crate::value::Object), so the result can be linked into other
/// records afterwards.
///
/// # Examples
///
/// ```
/// use errscribe::{array, object, value::Value};
///
/// let request = object! {
///     "method" => "GET",
///     "retries" => 3,
///     "headers" => object! { "accept" => "*/*" },
///     "hops" => array![1, 2],
/// };
/// assert_eq!(
///     Value::from(request).to_string(),
///     r#"{method:"GET",retries:3,headers:{accept:"*/*"},hops:[1,2]}"#
/// );
///
/// assert_eq!(Value::from(object! {}).to_string(), "{}");
/// ```
#[macro_export]
macro_rules! object {
    ($($key:expr => $value:expr),* $(,)?) => {
        {
            let object = $crate::value::Object::plain();
            $(
                object.insert($key, $value);
            )*
            object
        }
    };
}

/// Builds an array.
///
/// Every element converts into a [`Value`](crate::value::Value). The macro
/// evaluates to an [`Object`](crate::value::Object).
///
/// # Examples
///
/// ```
/// use errscribe::{array, value::Value};
///
/// let mixed = array!["a", 1, true, None::<i32>];
/// assert_eq!(Value::from(mixed).to_string(), r#"["a",1,true,null]"#);
///
/// let empty = array![];
/// assert_eq!(Value::from(empty).to_string(), "[]");
/// ```
#[macro_export]
macro_rules! array {
    ($($item:expr),* $(,)?) => {
        {
            let items: $crate::__private::Vec<$crate::value::Value> =
                $crate::__private::vec![$($crate::value::Value::from($item)),*];
            $crate::value::Object::array(items)
        }
    };
}
