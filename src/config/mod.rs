//! Configuration module

mod site;

pub use site::CardConfig;
pub use site::InvalidPagePolicy;
pub use site::LocaleConfig;
pub use site::SiteConfig;
