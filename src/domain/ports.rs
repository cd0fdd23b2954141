/// Resolved settings the server needs, regardless of where they came from.
pub trait ConfigProvider: Send + Sync {
    fn bind_host(&self) -> &str;
    fn bind_port(&self) -> u16;
    fn upstream_base_url(&self) -> &str;
    fn user_agent(&self) -> Option<&str>;
    fn log_level(&self) -> Option<&str>;
    fn json_logs(&self) -> bool;
}
