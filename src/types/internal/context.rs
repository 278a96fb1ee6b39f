use poem::Request;

/// Client metadata captured from an inbound request for audit logging
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientMeta {
    /// Extract client ip and user-agent from a request.
    ///
    /// Prefers the first entry of `X-Forwarded-For` (proxy deployments),
    /// falling back to the socket peer address.
    pub fn from_request(req: &Request) -> Self {
        let ip_address = req
            .header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| Some(req.remote_addr().to_string()));

        let user_agent = req.header("user-agent").map(str::to_string);

        Self {
            ip_address,
            user_agent,
        }
    }
}
