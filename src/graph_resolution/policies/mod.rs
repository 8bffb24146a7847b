pub mod exclusion_policy;
pub mod version_overrides;

pub use exclusion_policy::ExclusionPolicy;
pub use version_overrides::VersionOverrides;
