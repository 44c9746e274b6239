//! Starter documents assembled with the arena builders

use arjson::{Arena, ArrayBuilder, Node, ObjectBuilder, build_array_from};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateKind {
    /// Flat object with one value of each scalar kind
    Object,
    /// Mixed array of numbers, a string and null
    Array,
    /// Service configuration
    Config,
    /// package.json-style manifest
    Package,
}

impl TemplateKind {
    pub fn build(self, arena: &Arena) -> &Node<'_> {
        match self {
            Self::Object => ObjectBuilder::new(arena)
                .add("key", "value")
                .add("number", 42)
                .add("active", true)
                .build(),
            Self::Array => ArrayBuilder::new(arena)
                .add(1)
                .add(2)
                .add(3)
                .add("four")
                .add(())
                .build(),
            Self::Config => ObjectBuilder::new(arena)
                .add("name", "my-app")
                .add("version", "1.0.0")
                .add("port", 8080)
                .add("features", build_array_from(arena, ["auth", "api", "cache"]))
                .build(),
            Self::Package => {
                let scripts = ObjectBuilder::new(arena)
                    .add("test", "cargo test")
                    .add("build", "cargo build --release")
                    .build();
                ObjectBuilder::new(arena)
                    .add("name", "my-package")
                    .add("version", "1.0.0")
                    .add("description", "A sample package")
                    .add("main", "src/main.rs")
                    .add("scripts", scripts)
                    .build()
            }
        }
    }
}
