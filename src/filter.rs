use regex::{Regex, RegexBuilder};
use url::Url;

/// Binary and document extensions that are never followed
const DENIED_EXTENSIONS: &str = r"\.(pdf|jpg|jpeg|png|gif|svg|ico|webp|bmp|css|js|json|xml|zip|gz|tgz|tar|rar|7z|exe|dmg|msi|mp3|mp4|avi|mov|webm|doc|docx|xls|xlsx|ppt|pptx|woff|woff2|ttf|eot)$";

/// Decides which discovered links a crawl follows.
///
/// A link is admitted when its scheme is http or https, its path does not end in
/// a denied extension, no user exclude pattern matches it, and its host equals
/// the host of the traversal root.
#[derive(Debug)]
pub struct LinkFilter {
    root_host: Option<String>,
    denied_extensions: Regex,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a filter scoped to the host of `root`
    pub fn new(root: &Url, exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let denied_extensions = RegexBuilder::new(DENIED_EXTENSIONS)
            .case_insensitive(true)
            .build()?;

        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            root_host: root.host_str().map(str::to_ascii_lowercase),
            denied_extensions,
            exclude_regexes,
        })
    }

    /// Whether a discovered link should be crawled. Unparseable links are rejected.
    pub fn should_follow(&self, link: &str) -> bool {
        match Url::parse(link) {
            Ok(url) => self.should_follow_url(&url),
            Err(e) => {
                ::log::debug!("Rejecting unparseable link {:?}: {}", link, e);
                false
            }
        }
    }

    pub fn should_follow_url(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        if self.denied_extensions.is_match(url.path()) {
            return false;
        }

        if !self.is_same_host(url) {
            return false;
        }

        let url_str = url.as_str();
        !self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    /// Exact host comparison against the traversal root
    fn is_same_host(&self, url: &Url) -> bool {
        match (&self.root_host, url.host_str()) {
            (Some(root), Some(host)) => root.eq_ignore_ascii_case(host),
            _ => false,
        }
    }
}

/// Key used for the visited set: the URL without its fragment
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}
