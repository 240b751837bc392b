//! Statically dispatched activation.

use std::sync::Arc;

/// Produces an instance of contract `C`.
///
/// Generated code implements this once per bound contract, on the generated
/// `Scope` and (when the contract needs no scope) on the generated `Provider`.
/// There is no fallback implementation: asking for an unbound contract is a
/// compile error in the consuming crate.
///
/// # Examples
///
/// ```
/// use direct_di::runtime::Activate;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// struct Root;
/// impl Activate<dyn Greeter> for Root {
///     fn activate(&self) -> Arc<dyn Greeter> {
///         Arc::new(English)
///     }
/// }
///
/// let greeter: Arc<dyn Greeter> = Root.activate();
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub trait Activate<C: ?Sized> {
    /// Activates the binding registered for `C`.
    fn activate(&self) -> Arc<C>;
}
