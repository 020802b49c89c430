//! Texts shown to the user.

pub const GREETING: &str = "👋 Hi! Send me the title of a book and I'll look for a PDF or EPUB you can download.\n\
Pick a result from the list and I'll send you the file.";

pub const QUERY_TOO_SHORT: &str = "✍️ Please send at least 2 characters of the book title.";

pub const SESSION_EXPIRED: &str = "⌛ These results have expired. Send the title again to search.";

pub const NO_DOWNLOAD_LINK: &str =
    "❌ I couldn't find a download link on that page. Try another result.";

pub const UNSUPPORTED_FILE: &str =
    "❌ That link doesn't lead to a PDF or EPUB file. Try another result.";

pub const SEARCH_FAILED: &str = "❌ Something went wrong while searching. Please try again later.";

pub const DOWNLOAD_FAILED: &str =
    "❌ Something went wrong while fetching the book. Please try again later.";

pub const FORWARD_FAILED: &str =
    "❌ I found the file but couldn't forward it. The bot must be a member of the channel.";

pub const GOOGLE_LINK_LABEL: &str = "🔗 Search on Google";

pub const TRY_WEB_SEARCH: &str = "You can also try a web search:";

pub fn searching(query: &str) -> String {
    format!("🔎 Searching for \"{}\"...", query)
}

pub fn not_found(query: &str) -> String {
    format!(
        "❌ Sorry, I couldn't find a book matching \"{}\". Try other keywords.",
        query
    )
}

pub fn choices_header(query: &str, count: usize) -> String {
    format!("📚 Found {} result(s) for \"{}\". Pick one:", count, query)
}

pub fn fetching(title: &str) -> String {
    format!("⬇️ Fetching \"{}\"...", title)
}

pub fn too_large(size: u64, limit: u64) -> String {
    format!(
        "❌ The file is too large ({} MB, limit {} MB).",
        to_mb(size),
        to_mb(limit)
    )
}

/// Rounded to one decimal.
fn to_mb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

/// Button label for a result, trimmed to fit on one row.
pub fn choice_label(index: usize, title: &str) -> String {
    const MAX_CHARS: usize = 48;
    let title = title.trim();
    let short: String = if title.chars().count() > MAX_CHARS {
        let mut s: String = title.chars().take(MAX_CHARS - 1).collect();
        s.push('…');
        s
    } else {
        title.to_string()
    };
    format!("{}. {}", index + 1, short)
}
