pub mod resolver;
pub mod scanner;

pub use resolver::LinkResolver;
pub use scanner::extract_git_links;
