mod version;

pub use version::version_routes;
