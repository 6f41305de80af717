// crates/vc-interop-config/src/lib.rs
// ============================================================================
// Module: VC Interop Config Library
// Description: Harness configuration, implementation registry, and secrets.
// Purpose: Single source of truth for vc-interop.toml semantics.
// Dependencies: serde, toml, url, vc-interop-mutation
// ============================================================================

//! ## Overview
//! `vc-interop-config` defines the configuration model for the interop
//! harness: HTTP client settings, suite validation profile, and the
//! [`ImplementationRegistry`] of issuer and verifier endpoints. Validation is
//! strict and fail-closed. Secrets are resolved through [`SecretSource`] and
//! never stored in the config model.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod registry;
pub mod secrets;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ClientSettings;
pub use config::ConfigError;
pub use config::InteropConfig;
pub use config::SuiteSettings;
pub use registry::AuthConfig;
pub use registry::EndpointConfig;
pub use registry::EndpointRole;
pub use registry::ImplementationDescriptor;
pub use registry::ImplementationRegistry;
pub use registry::ROOT_CAPABILITY_PREFIX;
pub use registry::TagFilter;
pub use registry::TagPartition;
pub use secrets::EnvSecretSource;
pub use secrets::SecretSource;
pub use secrets::StaticSecretSource;
