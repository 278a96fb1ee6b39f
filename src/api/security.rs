use poem::middleware::SetHeader;

/// Security headers applied to every response.
///
/// Content-type sniffing and frame embedding are disabled, transport
/// security is pinned, and browser access to camera, microphone, and
/// geolocation is denied.
pub fn security_headers() -> SetHeader {
    SetHeader::new()
        .overriding("X-Content-Type-Options", "nosniff")
        .overriding("X-Frame-Options", "DENY")
        .overriding(
            "Strict-Transport-Security",
            "max-age=63072000; includeSubDomains; preload",
        )
        .overriding("Referrer-Policy", "strict-origin-when-cross-origin")
        .overriding(
            "Permissions-Policy",
            "camera=(), microphone=(), geolocation=()",
        )
}
