//! Default project skeletons
//!
//!     The trees handed out by [parse_or_default](crate::forsure::parsing::parse_or_default)
//!     and by `forsure skeleton`. Each is a plain [Node] tree, built fresh on every call.

use crate::forsure::ast::Node;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Project flavours with a known default layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    NextJs,
    React,
    Node,
    #[default]
    Generic,
}

impl ProjectType {
    pub const ALL: [ProjectType; 4] = [
        ProjectType::NextJs,
        ProjectType::React,
        ProjectType::Node,
        ProjectType::Generic,
    ];

    /// Lenient mapping from free-form hints such as `Next.js`, `nextjs` or `express`.
    /// Unknown hints map to [ProjectType::Generic].
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.trim().to_ascii_lowercase();
        if hint.contains("next") {
            ProjectType::NextJs
        } else if hint.contains("react") {
            ProjectType::React
        } else if hint.contains("node") || hint.contains("express") {
            ProjectType::Node
        } else {
            ProjectType::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::NextJs => "nextjs",
            ProjectType::React => "react",
            ProjectType::Node => "node",
            ProjectType::Generic => "generic",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectType::NextJs => "Next.js",
            ProjectType::React => "React",
            ProjectType::Node => "Node",
            ProjectType::Generic => "generic",
        };
        f.write_str(label)
    }
}

impl FromStr for ProjectType {
    type Err = String;

    /// Strict parse of the canonical names, for command line and config values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectType::ALL
            .into_iter()
            .find(|project_type| project_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown project type '{}' (expected one of: nextjs, react, node, generic)",
                    s
                )
            })
    }
}

fn dir(name: &str, children: Vec<Node>) -> Node {
    Node::directory(name, children)
}

fn file(name: &str) -> Node {
    Node::file(name)
}

/// The default skeleton for a project type.
pub fn default_structure(project_type: ProjectType) -> Node {
    let children = match project_type {
        ProjectType::NextJs => vec![
            dir(
                "app",
                vec![
                    file("page.tsx"),
                    file("layout.tsx"),
                    dir("api", vec![dir("auth", vec![file("route.ts")])]),
                ],
            ),
            dir("components", vec![dir("ui", vec![])]),
            dir("lib", vec![file("utils.ts")]),
            file("package.json"),
            file("next.config.js"),
        ],
        ProjectType::React => vec![
            dir(
                "src",
                vec![
                    dir("components", vec![]),
                    dir("hooks", vec![]),
                    dir("services", vec![]),
                    file("App.tsx"),
                    file("index.tsx"),
                ],
            ),
            dir("public", vec![file("index.html")]),
            file("package.json"),
        ],
        ProjectType::Node => vec![
            dir(
                "src",
                vec![
                    file("index.js"),
                    dir("routes", vec![file("index.js"), file("users.js"), file("auth.js")]),
                    dir(
                        "controllers",
                        vec![file("userController.js"), file("authController.js")],
                    ),
                    dir("models", vec![file("User.js")]),
                    dir("middleware", vec![file("auth.js"), file("error.js")]),
                    dir("config", vec![file("db.js"), file("env.js")]),
                ],
            ),
            dir("tests", vec![file("user.test.js"), file("auth.test.js")]),
            file("package.json"),
            file(".env.example"),
            file("README.md"),
        ],
        ProjectType::Generic => vec![
            dir("src", vec![]),
            dir("docs", vec![]),
            file("README.md"),
            file("package.json"),
        ],
    };
    Node::directory("root", children)
}
