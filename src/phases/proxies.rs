//! Proxies: reducing proxy configuration documents to the requested proxies
//!
//! Every manifest may ask for proxies from any number of configuration files.
//! Requests for the same file are unioned across manifests, and each file is
//! then filtered exactly once: every `ProxyGroup` keeps only the proxy
//! definitions whose `name` was requested, and groups left empty are dropped.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::info;
use xot::{Node, Xot};

use crate::defaults::{PROXY_GROUP, PROXY_ROOT, PROXY_TAGS};
use crate::error::{Error, Result};
use crate::filesystem::ensure_parent;
use crate::manifest::{LoadedManifest, ProxyFilterSpec};

use super::RunContext;

/// Proxy names requested per configuration file, in first-requested order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyRequests {
    files: Vec<(String, BTreeSet<String>)>,
}

impl ProxyRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union one request into the set.
    pub fn add(&mut self, spec: &ProxyFilterSpec) {
        let index = match self.files.iter().position(|(path, _)| *path == spec.path) {
            Some(index) => index,
            None => {
                self.files.push((spec.path.clone(), BTreeSet::new()));
                self.files.len() - 1
            }
        };
        self.files[index].1.extend(spec.proxies.iter().cloned());
    }

    /// Collect the requests of all manifests.
    pub fn from_manifests(manifests: &[LoadedManifest]) -> Self {
        let mut requests = Self::new();
        for loaded in manifests {
            for spec in &loaded.manifest.proxies {
                requests.add(spec);
            }
        }
        requests
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Requested names for a file, if any were requested.
    pub fn get(&self, path: &str) -> Option<&BTreeSet<String>> {
        self.files
            .iter()
            .find(|(candidate, _)| candidate == path)
            .map(|(_, names)| names)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.files.iter().map(|(path, names)| (path.as_str(), names))
    }
}

/// Filter every requested configuration file from the repository into the output.
pub fn execute(ctx: &RunContext, manifests: &[LoadedManifest]) -> Result<()> {
    let requests = ProxyRequests::from_manifests(manifests);
    for (path, names) in requests.iter() {
        info!("Filtering {} proxies in {}", names.len(), path);
        filter_file(&ctx.repo.join(path), &ctx.output.join(path), names)?;
    }
    Ok(())
}

/// Filter one configuration file into `output`, creating parent directories.
pub fn filter_file(input: &Path, output: &Path, wanted: &BTreeSet<String>) -> Result<()> {
    let xml = fs::read_to_string(input).map_err(|e| Error::io(input, e))?;
    let filtered = filter_document(input, &xml, wanted)?;
    ensure_parent(output)?;
    fs::write(output, filtered).map_err(|e| Error::io(output, e))
}

/// Filter a configuration document held in memory.
///
/// `source` only labels errors.
pub fn filter_document(source: &Path, xml: &str, wanted: &BTreeSet<String>) -> Result<String> {
    let error = |message: String| Error::ProxyConfig {
        path: source.to_path_buf(),
        message,
    };

    let mut xot = Xot::new();
    let doc = xot.parse(xml).map_err(|e| error(e.to_string()))?;
    let root = xot.document_element(doc).map_err(|e| error(e.to_string()))?;

    let root_name = xot.add_name(PROXY_ROOT);
    let group_name = xot.add_name(PROXY_GROUP);
    let name_attr = xot.add_name("name");
    let proxy_names: Vec<_> = PROXY_TAGS.iter().map(|tag| xot.add_name(tag)).collect();

    if xot.element(root).map(|element| element.name()) != Some(root_name) {
        return Err(error(format!(
            "Invalid ParaView XML file input: root element is not {}",
            PROXY_ROOT
        )));
    }

    let groups: Vec<Node> = xot
        .descendants(root)
        .filter(|node| xot.element(*node).is_some_and(|e| e.name() == group_name))
        .collect();

    let new_root = xot.new_element(root_name);
    let new_doc = xot
        .new_document_with_element(new_root)
        .map_err(|e| error(e.to_string()))?;

    for group in groups {
        let mut retained = Vec::new();
        for proxy_name in &proxy_names {
            retained.extend(xot.descendants(group).filter(|node| {
                xot.element(*node).is_some_and(|e| e.name() == *proxy_name)
                    && xot
                        .get_attribute(*node, name_attr)
                        .is_some_and(|name| wanted.contains(name))
            }));
        }
        if retained.is_empty() {
            continue;
        }

        // The copy keeps the group's attributes; its content is rebuilt below.
        let new_group = xot.clone_node(group);
        let content: Vec<Node> = xot
            .children(new_group)
            .filter(|child| {
                xot.element(*child).is_some()
                    || xot.text(*child).is_some()
                    || xot.comment(*child).is_some()
                    || xot.processing_instruction(*child).is_some()
            })
            .collect();
        for child in content {
            xot.remove(child).map_err(|e| error(e.to_string()))?;
        }
        for proxy in retained {
            let copy = xot.clone_node(proxy);
            xot.append(new_group, copy)
                .map_err(|e| error(e.to_string()))?;
        }
        xot.append(new_root, new_group)
            .map_err(|e| error(e.to_string()))?;
    }

    xot.to_string(new_doc).map_err(|e| error(e.to_string()))
}
