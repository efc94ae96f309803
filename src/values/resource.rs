use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::values::tag::ValueTag;

/// Which of the seven resource-shaped tags a [`Resource`] carries.
///
/// The core treats the payload itself as opaque; this crate only needs to tell the kinds apart for
/// `gettype`/comparison purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    File,
    Dir,
    StreamContext,
    MysqlLink,
    MysqlResult,
    XmlParser,
    Mcrypt,
}

impl ResourceKind {
    pub fn tag(self) -> ValueTag {
        match self {
            ResourceKind::File => ValueTag::FileRes,
            ResourceKind::Dir => ValueTag::DirRes,
            ResourceKind::StreamContext => ValueTag::StreamContext,
            ResourceKind::MysqlLink => ValueTag::MysqlLink,
            ResourceKind::MysqlResult => ValueTag::MysqlResult,
            ResourceKind::XmlParser => ValueTag::XmlParserRes,
            ResourceKind::Mcrypt => ValueTag::McryptRes,
        }
    }
}

/// An opaque host-owned resource handle.
///
/// Two resources are identical only if they share the same payload
/// allocation (`Rc::ptr_eq`); the core never inspects the payload.
#[derive(Clone)]
pub struct Resource {
    pub kind: ResourceKind,
    payload: Rc<dyn Any>,
    id: u64,
}

impl Resource {
    pub fn new(kind: ResourceKind, id: u64, payload: Rc<dyn Any>) -> Resource {
        Resource { kind, payload, id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn payload(&self) -> &Rc<dyn Any> {
        &self.payload
    }

    pub fn is_same(&self, other: &Resource) -> bool {
        Rc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resources_compare_by_payload_identity() {
        let payload: Rc<dyn Any> = Rc::new(42u32);
        let a = Resource::new(ResourceKind::File, 1, payload.clone());
        let b = Resource::new(ResourceKind::File, 1, payload);
        let c = Resource::new(ResourceKind::File, 1, Rc::new(42u32));
        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
    }
}
