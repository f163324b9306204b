use std::sync::{Arc, RwLock};

use crate::interface::Interface;

/// The process-wide, ordered registry of [`Interface`]s. Populated
/// once at startup by enumerating valid NICs; read by every traffic
/// thread and by [`Broadcast`](crate::broadcast::Broadcast).
#[derive(Default)]
pub struct InterfaceStack {
    interfaces: RwLock<Vec<Arc<Interface>>>,
}

impl InterfaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface at startup. Registration order is
    /// preserved and is the order [`Broadcast`](crate::broadcast::Broadcast)
    /// fans frames out in.
    pub fn register(&self, iface: Arc<Interface>) {
        self.interfaces.write().expect("poisoned").push(iface);
    }

    /// A snapshot of the registry in registration order.
    pub fn snapshot(&self) -> Vec<Arc<Interface>> {
        self.interfaces.read().expect("poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.interfaces.read().expect("poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_by_id(&self, id: u64) -> Option<Arc<Interface>> {
        self.interfaces
            .read()
            .expect("poisoned")
            .iter()
            .find(|i| i.id() == id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_io::fake::FakeFrameIo;
    use crate::frame_io::FrameIoHandle;

    fn dummy_interface(name: &str) -> Arc<Interface> {
        let handle: Box<dyn FrameIoHandle> = Box::new(FakeFrameIo::new());
        Arc::new(Interface::new(name, handle))
    }

    #[test]
    fn preserves_registration_order() {
        let stack = InterfaceStack::new();
        stack.register(dummy_interface("a"));
        stack.register(dummy_interface("b"));
        stack.register(dummy_interface("c"));
        let names: Vec<_> = stack.snapshot().iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
