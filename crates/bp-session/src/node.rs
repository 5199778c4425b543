//! Nodes of the definition graph: definitions and references to them.

use bp_types::{DeploymentNamespace, LocalUuid};

use crate::definition::Definition;

/// A pointer to an object that resolves to an id without necessarily
/// creating it.
#[derive(Clone, Debug)]
pub enum Reference {
    /// The object tagged `tag` in the same application.
    Local { local_uuid: LocalUuid, tag: String },

    /// The object tagged `tag` in the deployed application `app_name`.
    Remote {
        local_uuid: LocalUuid,
        app_name: String,
        tag: String,
        namespace: DeploymentNamespace,
    },

    /// Like [`Reference::Remote`], but `definition` is first deployed as
    /// the only object of `app_name`.
    Deployed {
        local_uuid: LocalUuid,
        app_name: String,
        tag: String,
        namespace: DeploymentNamespace,
        definition: Definition,
    },
}

impl Reference {
    pub fn local(tag: impl Into<String>) -> Self {
        Self::Local {
            local_uuid: LocalUuid::new(),
            tag: tag.into(),
        }
    }

    pub fn remote(app_name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::Remote {
            local_uuid: LocalUuid::new(),
            app_name: app_name.into(),
            tag: tag.into(),
            namespace: DeploymentNamespace::default(),
        }
    }

    pub fn deployed(app_name: impl Into<String>, tag: impl Into<String>, definition: Definition) -> Self {
        Self::Deployed {
            local_uuid: LocalUuid::new(),
            app_name: app_name.into(),
            tag: tag.into(),
            namespace: DeploymentNamespace::default(),
            definition,
        }
    }

    /// Resolve in `namespace` instead of the default. No effect on local
    /// references.
    pub fn in_namespace(mut self, ns: DeploymentNamespace) -> Self {
        match &mut self {
            Self::Local { .. } => {}
            Self::Remote { namespace, .. } | Self::Deployed { namespace, .. } => *namespace = ns,
        }
        self
    }

    pub fn local_uuid(&self) -> LocalUuid {
        match self {
            Self::Local { local_uuid, .. }
            | Self::Remote { local_uuid, .. }
            | Self::Deployed { local_uuid, .. } => *local_uuid,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Local { tag, .. } | Self::Remote { tag, .. } | Self::Deployed { tag, .. } => tag.as_str(),
        }
    }

    /// The application the reference points into, if not the current one.
    pub fn app_name(&self) -> Option<&str> {
        match self {
            Self::Local { .. } => None,
            Self::Remote { app_name, .. } | Self::Deployed { app_name, .. } => Some(app_name.as_str()),
        }
    }
}

/// Anything the materializer can turn into an object id.
#[derive(Clone, Debug)]
pub enum Node {
    Definition(Definition),
    Reference(Reference),
}

impl Node {
    pub fn local_uuid(&self) -> LocalUuid {
        match self {
            Self::Definition(d) => d.local_uuid(),
            Self::Reference(r) => r.local_uuid(),
        }
    }
}

impl From<Definition> for Node {
    fn from(definition: Definition) -> Self {
        Self::Definition(definition)
    }
}

impl From<Reference> for Node {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Queue;

    #[test]
    fn clones_keep_local_uuid() {
        let r = Reference::local("q");
        assert_eq!(r.clone().local_uuid(), r.local_uuid());

        let d = Definition::new(Queue::new("q"));
        let node = Node::from(d.clone());
        assert_eq!(node.local_uuid(), d.local_uuid());
    }

    #[test]
    fn separate_references_get_separate_uuids() {
        assert_ne!(Reference::local("q").local_uuid(), Reference::local("q").local_uuid());
    }

    #[test]
    fn namespace_override() {
        let r = Reference::remote("app", "q").in_namespace(DeploymentNamespace::Global);
        assert!(matches!(r, Reference::Remote { namespace: DeploymentNamespace::Global, .. }));
        assert_eq!(r.app_name(), Some("app"));

        let local = Reference::local("q").in_namespace(DeploymentNamespace::Global);
        assert_eq!(local.app_name(), None);
        assert_eq!(local.tag(), "q");
    }
}
