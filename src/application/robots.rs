//! Crawler policy served at `/robots.txt`.

/// Crawlers and HTTP client libraries refused site-wide.
pub const BLOCKED_AGENTS: &[&str] = &[
    "Baiduspider",
    "Sogou spider",
    "YodaoBot",
    "360Spider",
    "Bytespider",
    "Sosospider",
    "Wechat",
    "Python-urllib",
    "python-requests",
    "Go-http-client",
    "Go-resty",
    "Ruby",
    "Java",
    "Apache-HttpClient",
    "PHP",
    "Node-Fetch",
    "axios",
    "Scrapy",
    "Pyspider",
    "Colly",
];

/// Search engines explicitly allowed.
pub const ALLOWED_AGENTS: &[&str] = &["Googlebot", "bingbot", "Slurp"];

pub const CRAWL_DELAY_SECONDS: u32 = 10;

/// Build the robots.txt body.
pub fn robots_txt() -> String {
    let mut out = String::from("User-agent: *\nDisallow: /console/\n");

    for agent in BLOCKED_AGENTS {
        out.push_str(&format!("\nUser-agent: {agent}\nDisallow: /\n"));
    }
    for agent in ALLOWED_AGENTS {
        out.push_str(&format!("\nUser-agent: {agent}\nAllow: /\n"));
    }

    out.push_str(&format!("\nCrawl-delay: {CRAWL_DELAY_SECONDS}\n"));
    out
}
