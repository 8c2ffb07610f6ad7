//! Template share layout on an image server.
//!
//! Templates live under `\\<server>\va_data$\programdata\vision\templates`,
//! one directory per template kind.

const TEMPLATES_SHARE: &str = r"va_data$\programdata\vision\templates";

pub const PROTOCOL_DIR: &str = "protocol";
pub const OBJECTIVE_DIR: &str = "objective";
pub const PLAN_DIR: &str = "plan";

/// UNC root of the template share. Accepts a bare host name or address,
/// with or without leading backslashes.
pub fn templates_root(image_server: &str) -> String {
    let server = image_server.trim_matches('\\');
    format!(r"\\{server}\{TEMPLATES_SHARE}")
}

pub fn template_dir(image_server: &str, kind: &str) -> String {
    format!(r"{}\{kind}", templates_root(image_server))
}

pub fn protocol_dir(image_server: &str) -> String {
    template_dir(image_server, PROTOCOL_DIR)
}

pub fn objective_dir(image_server: &str) -> String {
    template_dir(image_server, OBJECTIVE_DIR)
}

pub fn plan_dir(image_server: &str) -> String {
    template_dir(image_server, PLAN_DIR)
}
