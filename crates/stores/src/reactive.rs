use tokio::sync::watch;

/// A store field the UI can read and watch for changes.
///
/// Thin wrapper over `tokio::sync::watch`: reads clone the current value,
/// writes replace it wholesale and wake every watcher. There is no mutual
/// exclusion between writers; concurrent mutations are last-write-wins,
/// which is the documented behavior of this layer.
pub struct Reactive<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Reactive<T> {
    /// # Examples
    /// ```
    /// use stores::Reactive;
    /// let field = Reactive::new(1u32);
    /// field.set(2);
    /// field.update(|v| *v += 1);
    /// assert_eq!(field.get(), 3);
    /// ```
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx }
    }

    /// Clone of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value and notify watchers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate in place and notify watchers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Watch for changes; the receiver borrows the latest value.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Reactive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_roundtrip() {
        let field = Reactive::new(0u32);
        field.set(7);
        assert_eq!(field.get(), 7);
    }

    #[test]
    fn update_mutates_in_place() {
        let field = Reactive::new(vec![1, 2]);
        field.update(|v| v.push(3));
        assert_eq!(field.get(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn watchers_wake_on_set() {
        let field = Reactive::new(false);
        let mut rx = field.watch();
        field.set(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }
}
