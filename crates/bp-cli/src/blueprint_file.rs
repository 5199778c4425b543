//! Blueprint files: a TOML description of tagged objects.
//!
//! ```toml
//! [[object]]
//! tag = "base"
//! kind = "image"
//! commands = ["apt-get update"]
//!
//! [[object]]
//! tag = "worker"
//! kind = "function"
//! image = { ref = "base" }
//! secrets = [{ app = "shared", ref = "creds", namespace = "global" }]
//! ```
//!
//! A reference `{ ref = "tag" }` points at another object of the same
//! file; adding `app = "name"` points into a deployed app instead, and a
//! `deploy = { kind = ... }` table deploys that object as `name` first.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context};
use bp_session::objects::{Dict, Function, Image, Queue, Secret, SharedVolume};
use bp_session::{Blueprint, Definition, Node, Reference};
use bp_types::DeploymentNamespace;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlueprintFile {
    #[serde(default, rename = "object")]
    pub objects: Vec<ObjectSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectSpec {
    pub tag: String,
    /// Registry label; defaults to the tag.
    pub label: Option<String>,
    #[serde(flatten)]
    pub body: ObjectBody,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectBody {
    Queue,
    SharedVolume,
    Dict {
        #[serde(default)]
        data: BTreeMap<String, toml::Value>,
    },
    Secret {
        #[serde(default)]
        env: BTreeMap<String, String>,
    },
    Image {
        #[serde(default)]
        commands: Vec<String>,
        base: Option<RefSpec>,
    },
    Function {
        image: Option<RefSpec>,
        #[serde(default)]
        secrets: Vec<RefSpec>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefSpec {
    #[serde(rename = "ref")]
    pub tag: String,
    pub app: Option<String>,
    #[serde(default)]
    pub namespace: DeploymentNamespace,
    pub deploy: Option<Box<InlineObject>>,
}

/// An untagged object embedded in a reference.
#[derive(Debug, Deserialize)]
pub struct InlineObject {
    pub label: Option<String>,
    #[serde(flatten)]
    pub body: ObjectBody,
}

impl BlueprintFile {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading blueprint {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing blueprint {}", path.display()))
    }

    pub fn into_blueprint(self) -> anyhow::Result<Blueprint> {
        let mut blueprint = Blueprint::new();
        for spec in self.objects {
            let label = spec.label.unwrap_or_else(|| spec.tag.clone());
            let definition = spec
                .body
                .into_definition(&label)
                .with_context(|| format!("object {:?}", spec.tag))?;
            blueprint.insert(spec.tag, definition)?;
        }
        Ok(blueprint)
    }
}

impl ObjectBody {
    fn into_definition(self, label: &str) -> anyhow::Result<Definition> {
        let definition = match self {
            Self::Queue => Definition::new(Queue::new(label)),
            Self::SharedVolume => Definition::new(SharedVolume::new(label)),
            Self::Dict { data } => Definition::new(Dict::new(label).with_data(serde_json::to_value(data)?)?),
            Self::Secret { env } => {
                let secret = env
                    .into_iter()
                    .fold(Secret::new(label), |secret, (k, v)| secret.with_env(k, v));
                Definition::new(secret)
            }
            Self::Image { commands, base } => {
                let image = match base {
                    Some(base) => Image::layered(label, base.into_node()?),
                    None => Image::new(label),
                };
                Definition::new(image.run_commands(commands))
            }
            Self::Function { image, secrets } => {
                let mut function = Function::new(label);
                if let Some(image) = image {
                    function = function.with_image(image.into_node()?);
                }
                for secret in secrets {
                    function = function.with_secret(secret.into_node()?);
                }
                Definition::new(function)
            }
        };
        Ok(definition)
    }
}

impl RefSpec {
    fn into_node(self) -> anyhow::Result<Node> {
        let reference = match (self.app, self.deploy) {
            (None, None) => Reference::local(self.tag),
            (None, Some(_)) => bail!("reference to {:?} has `deploy` but no `app`", self.tag),
            (Some(app), None) => Reference::remote(app, self.tag).in_namespace(self.namespace),
            (Some(app), Some(inline)) => {
                let label = inline.label.unwrap_or_else(|| self.tag.clone());
                let definition = inline.body.into_definition(&label)?;
                Reference::deployed(app, self.tag, definition).in_namespace(self.namespace)
            }
        };
        Ok(reference.into())
    }
}
