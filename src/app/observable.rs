use std::sync::Arc;
use tokio::sync::watch;

// A state slot the UI can read from and subscribe to.
// Every update replaces the value as a whole, subscribers are woken up and
// read the latest value (intermediate values may be skipped).
pub struct Observable<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.sender.borrow()
    }

    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    // Mutate in place, subscribers are only notified if `modify` returns true
    pub fn update<F>(&self, modify: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
    {
        self.sender.send_if_modified(modify)
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let slot = Observable::new(1);
        let other = slot.clone();
        other.set(2);
        assert_eq!(slot.get(), 2);
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let slot: Observable<Vec<u32>> = Default::default();
        let mut receiver = slot.subscribe();

        slot.set(vec![1, 2]);
        receiver.changed().await.unwrap();
        assert_eq!(*receiver.borrow(), vec![1, 2]);
    }

    #[test]
    fn update_without_change_does_not_notify() {
        let slot = Observable::new(vec![1]);
        let receiver = slot.subscribe();

        assert!(!slot.update(|_| false));
        assert!(!receiver.has_changed().unwrap());

        assert!(slot.update(|v| {
            v.push(2);
            true
        }));
        assert!(receiver.has_changed().unwrap());
        assert_eq!(slot.get(), vec![1, 2]);
    }
}
