/// Splits a list of endpoint URLs on commas and whitespace, dropping blanks and repeats
/// while keeping the first-seen order.
pub fn parse_rpc_urls(input: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for url in input.split([',', ' ', '\n', '\t']).map(str::trim).filter(|s| !s.is_empty()) {
        if !urls.iter().any(|seen| seen == url) {
            urls.push(url.to_string());
        }
    }
    urls
}
