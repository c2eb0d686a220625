use tokio::sync::watch;

/// Whether the surface a poller serves is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool { self == Visibility::Visible }
}

/// Host-driven visibility signal.
///
/// The host flips it with [`set_visible`](Self::set_visible) and
/// [`set_hidden`](Self::set_hidden); pollers observe it through
/// [`subscribe`](Self::subscribe).
#[derive(Debug)]
pub struct PageVisibility {
    sender: watch::Sender<Visibility>,
}

impl Default for PageVisibility {
    fn default() -> Self { Self::new(Visibility::Visible) }
}

impl PageVisibility {
    pub fn new(initial: Visibility) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn set_visible(&self) { self.set(Visibility::Visible); }

    pub fn set_hidden(&self) { self.set(Visibility::Hidden); }

    /// Update the state; observers are only woken on an actual change.
    pub fn set(&self, visibility: Visibility) {
        self.sender.send_if_modified(|current| {
            let changed = *current != visibility;
            *current = visibility;
            changed
        });
    }

    pub fn get(&self) -> Visibility { *self.sender.borrow() }

    pub fn subscribe(&self) -> watch::Receiver<Visibility> { self.sender.subscribe() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_visible() {
        assert_eq!(PageVisibility::default().get(), Visibility::Visible);
    }

    #[test]
    fn test_subscriber_sees_latest_state() {
        let page = PageVisibility::default();
        let rx = page.subscribe();
        page.set_hidden();
        assert_eq!(*rx.borrow(), Visibility::Hidden);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_same_state_does_not_notify() {
        let page = PageVisibility::default();
        let rx = page.subscribe();
        page.set_visible();
        assert!(!rx.has_changed().unwrap());
    }
}
