//! Module classification.
//!
//! Resolves one declared `(name, source, version)` triple into a [`Module`]
//! provenance record:
//!
//! | protocol | source          | version          | path               |
//! |----------|-----------------|------------------|--------------------|
//! | `ssh`    | repository      | git ref          | repository subpath |
//! | `file`   | as declared     | as declared      | endpoint path      |
//! | other    | as declared     | as declared      | endpoint path      |
//!
//! A `file` source that comes with a non-empty version is a registry address
//! (`terraform-aws-modules/vpc/aws` + `5.0.0`) and is reported as `registry`.

use super::endpoint::{EndpointClassifier, TransportEndpointParser};
use super::git::split_git_location;
use crate::error::Result;
use crate::types::{Module, Protocol};

/// Classifies module declarations.
#[derive(Debug, Clone, Default)]
pub struct ModuleClassifier<C = TransportEndpointParser> {
    endpoints: C,
}

impl ModuleClassifier {
    /// Create a classifier using the default endpoint rules.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            endpoints: TransportEndpointParser::new(),
        }
    }
}

impl<C: EndpointClassifier> ModuleClassifier<C> {
    /// Create a classifier on top of a custom endpoint classifier.
    #[must_use]
    pub const fn with_endpoint_classifier(endpoints: C) -> Self {
        Self { endpoints }
    }

    /// Resolve one declaration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ModSourceError::EndpointParse`] naming the module if
    /// the source is not a valid location.
    pub fn resolve(&self, name: &str, source: &str, version: &str) -> Result<Module> {
        let endpoint = self.endpoints.classify(source).map_err(|e| e.for_module(name))?;

        let mut module = Module {
            name: name.to_string(),
            declared_source: source.to_string(),
            declared_version: version.to_string(),
            protocol: Protocol::from(endpoint.protocol.as_str()),
            resolved_source: source.to_string(),
            resolved_version: version.to_string(),
            resolved_path: endpoint.path.clone(),
            git: None,
        };

        match module.protocol {
            Protocol::Ssh => {
                let location = split_git_location(&endpoint.path);
                module.resolved_source = location.repository.clone();
                // the ref always wins over the version attribute, even when empty
                module.resolved_version = location.ref_.clone();
                module.resolved_path = location.subpath.clone();
                module.git = Some(location);
            }
            Protocol::File if !version.is_empty() => {
                module.protocol = Protocol::Registry;
            }
            _ => {}
        }

        tracing::debug!(
            module = %module.name,
            protocol = %module.protocol,
            source = %module.resolved_source,
            version = %module.resolved_version,
            path = %module.resolved_path,
            "Classified module"
        );
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModSourceError;
    use crate::resolver::endpoint::{Endpoint, MockEndpointClassifier};
    use crate::types::GitLocation;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_ssh_module_takes_git_components() {
        let classifier = ModuleClassifier::new();
        let module = classifier
            .resolve("net", "git@example.com:acme/widgets.git?ref=2.1.0//modules/net", "9.9.9")
            .unwrap();

        assert_eq!(module.protocol, Protocol::Ssh);
        assert_eq!(module.resolved_source, "widgets.git");
        assert_eq!(module.resolved_version, "2.1.0");
        assert_eq!(module.resolved_path, "modules/net");
        assert_eq!(module.declared_version, "9.9.9");
        assert_eq!(
            module.git,
            Some(GitLocation {
                owner: "acme".to_string(),
                repository: "widgets.git".to_string(),
                ref_: "2.1.0".to_string(),
                subpath: "modules/net".to_string(),
            })
        );
    }

    #[test]
    fn test_ssh_module_without_ref_drops_declared_version() {
        let module = ModuleClassifier::new()
            .resolve("net", "git@github.com:acme/widgets.git", "1.0.0")
            .unwrap();
        assert_eq!(module.resolved_version, "");
        assert_eq!(module.resolved_path, "");
    }

    #[test]
    fn test_ssh_module_that_does_not_decompose_is_kept_empty() {
        let module = ModuleClassifier::new()
            .resolve("net", "git@github.com:acme/widgets", "")
            .unwrap();
        assert_eq!(module.protocol, Protocol::Ssh);
        assert_eq!(module.resolved_source, "");
        assert_eq!(module.git, Some(GitLocation::default()));
    }

    #[test]
    fn test_local_path_without_version_is_file() {
        let module = ModuleClassifier::new().resolve("vpc", "./local/modules/vpc", "").unwrap();
        assert_eq!(module.protocol, Protocol::File);
        assert_eq!(module.resolved_path, "./local/modules/vpc");
        assert_eq!(module.resolved_source, "./local/modules/vpc");
    }

    #[test]
    fn test_local_path_with_version_is_registry() {
        let module = ModuleClassifier::new().resolve("vpc", "./local/modules/vpc", "1.0.0").unwrap();
        assert_eq!(module.protocol, Protocol::Registry);
        assert_eq!(module.resolved_path, "./local/modules/vpc");
        assert_eq!(module.resolved_version, "1.0.0");
    }

    #[test_case("terraform-aws-modules/vpc/aws", "~> 5.0", Protocol::Registry ; "registry address with version")]
    #[test_case("terraform-aws-modules/vpc/aws", "", Protocol::File ; "registry address without version")]
    #[test_case("https://example.com/vpc.zip", "", Protocol::Other("https".to_string()) ; "https archive")]
    #[test_case("https://example.com/vpc.zip", "1.0.0", Protocol::Other("https".to_string()) ; "versioned https is not registry")]
    #[test_case("s3://bucket/vpc.zip", "", Protocol::Other("s3".to_string()) ; "s3 bucket")]
    fn test_protocol_tie_break(source: &str, version: &str, expected: Protocol) {
        let module = ModuleClassifier::new().resolve("m", source, version).unwrap();
        assert_eq!(module.protocol, expected);
    }

    #[test]
    fn test_other_protocols_pass_path_and_version_through() {
        let module = ModuleClassifier::new()
            .resolve("zip", "https://example.com/modules/vpc.zip?archive=zip", "2.0.0")
            .unwrap();
        assert_eq!(module.resolved_path, "/modules/vpc.zip?archive=zip");
        assert_eq!(module.resolved_version, "2.0.0");
        assert_eq!(module.git, None);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let classifier = ModuleClassifier::new();
        for (source, version) in [
            ("git@example.com:acme/widgets.git?ref=2.1.0//modules/net", ""),
            ("./local/modules/vpc", "1.0.0"),
            ("https://example.com/vpc.zip", ""),
        ] {
            assert_eq!(
                classifier.resolve("m", source, version).unwrap(),
                classifier.resolve("m", source, version).unwrap()
            );
        }
    }

    #[test]
    fn test_malformed_source_fails_with_module_name() {
        let result = ModuleClassifier::new().resolve("broken", "not a valid uri###", "");
        match result {
            Err(ModSourceError::EndpointParse { module, module_source, .. }) => {
                assert_eq!(module, "broken");
                assert_eq!(module_source, "not a valid uri###");
            }
            other => panic!("expected classification error, got {other:?}"),
        }
    }

    #[test]
    fn test_uses_injected_endpoint_classifier() {
        let mut endpoints = MockEndpointClassifier::new();
        endpoints
            .expect_classify()
            .times(1)
            .returning(|_| {
                Ok(Endpoint {
                    protocol: "gcs".to_string(),
                    path: "bucket/key".to_string(),
                    ..Endpoint::default()
                })
            });

        let module = ModuleClassifier::with_endpoint_classifier(endpoints)
            .resolve("m", "custom", "1.0.0")
            .unwrap();
        assert_eq!(module.protocol, Protocol::Other("gcs".to_string()));
        assert_eq!(module.resolved_path, "bucket/key");
        assert_eq!(module.resolved_version, "1.0.0");
    }

    #[test]
    fn test_endpoint_errors_propagate() {
        let mut endpoints = MockEndpointClassifier::new();
        endpoints.expect_classify().returning(|source| {
            Err(crate::err!(EndpointParse {
                module: String::new(),
                module_source: source.to_string(),
                message: "rejected".to_string(),
            }))
        });

        let result = ModuleClassifier::with_endpoint_classifier(endpoints).resolve("m", "anything", "");
        assert!(matches!(result, Err(ModSourceError::EndpointParse { module, .. }) if module == "m"));
    }
}
