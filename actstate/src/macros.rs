/// Wraps a function in a [`StatefulAction`](crate::StatefulAction) named after
/// the function itself.
///
/// ```
/// use actstate::wrap_action;
///
/// async fn load_user(id: u32) -> Result<String, String> {
///     Ok(format!("user-{id}"))
/// }
///
/// let action = wrap_action!(load_user);
/// assert_eq!(action.name(), "load_user");
/// ```
///
/// `wrap_action!(fallible path)` uses
/// [`StatefulAction::wrap_fallible`](crate::StatefulAction::wrap_fallible).
/// An explicit name can follow the function: `wrap_action!(f, "name")`.
#[macro_export]
macro_rules! wrap_action {
    // The last path segment names the action.
    (@name $first:ident $(:: $rest:ident)*) => {
        $crate::wrap_action!(@last $first $($rest)*)
    };

    (@last $last:ident) => {
        stringify!($last)
    };

    (@last $head:ident $($tail:ident)+) => {
        $crate::wrap_action!(@last $($tail)+)
    };

    (fallible $($function:ident)::+ $(,)?) => {
        $crate::StatefulAction::wrap_fallible(
            $crate::wrap_action!(@name $($function)::+),
            $($function)::+,
        )
    };

    ($($function:ident)::+ $(,)?) => {
        $crate::StatefulAction::wrap(
            $crate::wrap_action!(@name $($function)::+),
            $($function)::+,
        )
    };

    ($function:expr, $name:expr $(,)?) => {
        $crate::StatefulAction::wrap($name, $function)
    };
}
