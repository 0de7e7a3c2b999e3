/// Registry used when no config file overrides it.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Published index of every package with type definitions available.
pub const TYPE_DEFINITION_INDEX_URL: &str =
    "https://typespublisher.blob.core.windows.net/typespublisher/data/search-index-min.json";

/// Scope prefix for type definition packages.
pub const TYPES_SCOPE_PREFIX: &str = "@types/";
