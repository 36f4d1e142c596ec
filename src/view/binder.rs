//! Failure-isolating connection between a store and a view.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::domain::RenderError;
use crate::store::{ObservableStore, Subscription};

/// Something that presents a state snapshot.
///
/// Any `FnMut(&S) -> Result<(), RenderError>` closure is a view, so ad-hoc
/// renderers need no wrapper type.
pub trait View<S> {
    /// Presents `state`. The snapshot is read-only.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] when the output cannot be produced. The
    /// binder logs it; the store and other views are unaffected.
    fn render(&mut self, state: &S) -> Result<(), RenderError>;
}

impl<S, F> View<S> for F
where
    F: FnMut(&S) -> Result<(), RenderError>,
{
    fn render(&mut self, state: &S) -> Result<(), RenderError> {
        self(state)
    }
}

/// Subscribes `view` to `store` under the tag `name`.
///
/// The view renders the current snapshot immediately and again after every
/// committed write. Errors returned by the view and panics raised inside it
/// are caught and logged with `name`; neither reaches the store or the views
/// notified after this one.
///
/// Returns the store's subscription handle unchanged.
///
/// # Examples
///
/// ```
/// use bankflow::domain::RenderError;
/// use bankflow::store::ObservableStore;
/// use bankflow::view::connect;
///
/// let store = ObservableStore::new(0_u32);
/// let broken = |_: &u32| -> Result<(), RenderError> { Err(RenderError::Invalid("nope".into())) };
/// let fine = |_: &u32| -> Result<(), RenderError> { Ok(()) };
/// let _broken = connect(&store, broken, "broken");
/// let _fine = connect(&store, fine, "fine");
///
/// store.set(1); // the broken view is logged and skipped
/// assert_eq!(store.subscriber_count(), 2);
/// ```
pub fn connect<S, V>(store: &ObservableStore<S>, mut view: V, name: impl Into<String>) -> Subscription
where
    S: Clone + PartialEq + 'static,
    V: View<S> + 'static,
{
    let name = name.into();
    tracing::debug!(view = %name, "connecting view");

    store.subscribe(move |state: &S| {
        let _span = tracing::debug_span!("render", view = %name).entered();
        match panic::catch_unwind(AssertUnwindSafe(|| view.render(state))) {
            Ok(Ok(())) => tracing::trace!("render complete"),
            Ok(Err(err)) => tracing::error!(view = %name, error = %err, "render failed"),
            Err(payload) => tracing::error!(
                view = %name,
                panic = %panic_message(payload.as_ref()),
                "render panicked"
            ),
        }
    })
}

fn panic_message<'a>(payload: &'a (dyn Any + Send + 'static)) -> &'a str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
