//! Abstract Factory: families of products that must be used together.
//!
//! An `UploadService` needs an object store and a queue from the *same*
//! provider. It receives a factory and never names a concrete type.

use crate::catalog::DemoContext;
use crate::error::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

pub trait ObjectStore {
    fn family(&self) -> &'static str;
    fn put(&self, key: &str, bytes: &[u8]) -> String;
    fn get(&self, key: &str) -> Option<Vec<u8>>;
}

pub trait MessageQueue {
    fn family(&self) -> &'static str;
    fn publish(&self, message: String);
    fn drain(&self) -> Vec<String>;
}

pub trait CloudFactory {
    fn name(&self) -> &'static str;
    fn object_store(&self) -> Box<dyn ObjectStore>;
    fn message_queue(&self) -> Box<dyn MessageQueue>;
}

// --- Local family -----------------------------------------------------------

#[derive(Default)]
pub struct LocalDiskStore {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl ObjectStore for LocalDiskStore {
    fn family(&self) -> &'static str {
        "local"
    }

    fn put(&self, key: &str, bytes: &[u8]) -> String {
        self.files.borrow_mut().insert(key.to_string(), bytes.to_vec());
        format!("file:///var/data/{key}")
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(key).cloned()
    }
}

#[derive(Default)]
pub struct InProcessQueue {
    messages: RefCell<VecDeque<String>>,
}

impl MessageQueue for InProcessQueue {
    fn family(&self) -> &'static str {
        "local"
    }

    fn publish(&self, message: String) {
        self.messages.borrow_mut().push_back(message);
    }

    fn drain(&self) -> Vec<String> {
        self.messages.borrow_mut().drain(..).collect()
    }
}

pub struct LocalFactory;

impl CloudFactory for LocalFactory {
    fn name(&self) -> &'static str {
        "Local"
    }

    fn object_store(&self) -> Box<dyn ObjectStore> {
        Box::new(LocalDiskStore::default())
    }

    fn message_queue(&self) -> Box<dyn MessageQueue> {
        Box::new(InProcessQueue::default())
    }
}

// --- Mock cloud family ------------------------------------------------------

pub struct MockBucket {
    bucket: String,
    objects: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl ObjectStore for MockBucket {
    fn family(&self) -> &'static str {
        "cloud"
    }

    fn put(&self, key: &str, bytes: &[u8]) -> String {
        println!("  [cloud] PUT s3://{}/{} ({} bytes)", self.bucket, key, bytes.len());
        self.objects.borrow_mut().insert(key.to_string(), bytes.to_vec());
        format!("s3://{}/{}", self.bucket, key)
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.borrow().get(key).cloned()
    }
}

pub struct MockTopic {
    topic: String,
    messages: RefCell<Vec<String>>,
}

impl MessageQueue for MockTopic {
    fn family(&self) -> &'static str {
        "cloud"
    }

    fn publish(&self, message: String) {
        println!("  [cloud] publish to {}", self.topic);
        self.messages.borrow_mut().push(message);
    }

    fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

pub struct MockCloudFactory {
    pub bucket: String,
    pub topic: String,
}

impl CloudFactory for MockCloudFactory {
    fn name(&self) -> &'static str {
        "MockCloud"
    }

    fn object_store(&self) -> Box<dyn ObjectStore> {
        Box::new(MockBucket {
            bucket: self.bucket.clone(),
            objects: RefCell::new(BTreeMap::new()),
        })
    }

    fn message_queue(&self) -> Box<dyn MessageQueue> {
        Box::new(MockTopic {
            topic: self.topic.clone(),
            messages: RefCell::new(Vec::new()),
        })
    }
}

// --- Client -----------------------------------------------------------------

pub struct UploadService {
    store: Box<dyn ObjectStore>,
    queue: Box<dyn MessageQueue>,
}

impl UploadService {
    pub fn new(factory: &dyn CloudFactory) -> Self {
        Self {
            store: factory.object_store(),
            queue: factory.message_queue(),
        }
    }

    pub fn upload(&self, key: &str, bytes: &[u8]) -> String {
        let location = self.store.put(key, bytes);
        self.queue.publish(format!("uploaded {key} -> {location}"));
        location
    }

    pub fn download(&self, key: &str) -> Option<Vec<u8>> {
        self.store.get(key)
    }

    pub fn pending_notifications(&self) -> Vec<String> {
        self.queue.drain()
    }

    pub fn families(&self) -> (&'static str, &'static str) {
        (self.store.family(), self.queue.family())
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let factories: Vec<Box<dyn CloudFactory>> = vec![
        Box::new(LocalFactory),
        Box::new(MockCloudFactory {
            bucket: "catalog-assets".into(),
            topic: "uploads".into(),
        }),
    ];

    for factory in &factories {
        ctx.section(&format!("{} family", factory.name()));
        let service = UploadService::new(factory.as_ref());
        let location = service.upload("avatar.png", b"\x89PNG fake bytes");
        println!("Stored at {location}");
        println!("Round trip ok: {}", service.download("avatar.png").is_some());
        for note in service.pending_notifications() {
            println!("Notification: {note}");
        }
        let (store, queue) = service.families();
        println!("Store family = {store}, queue family = {queue}");
    }

    Ok(())
}
