use pulldown_cmark::{html, Options, Parser};

/// Render a post body to sanitized HTML.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_FOOTNOTES);
    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    ammonia::clean(&html_output)
}

fn is_void_element(name: &str) -> bool {
    matches!(name, "br" | "hr" | "img" | "input" | "meta" | "link")
}

/// Cut an HTML fragment down to its first `max_words` words, keeping the
/// markup intact: tags do not count as words, anything cut off gets an
/// ellipsis, and tags left open by the cut are closed again.
///
/// A word is a maximal run of non-whitespace text between tags, so
/// `<em>bold</em>ness` counts two words. Input is expected to be
/// sanitizer output, i.e. balanced markup.
pub fn truncate_html_words(html: &str, max_words: usize) -> String {
    let mut out = String::with_capacity(html.len());
    let mut open_tags: Vec<String> = Vec::new();
    let mut words = 0;
    let mut in_word = false;
    let mut truncated = false;

    let mut rest = html;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('<') {
            let end = match after.find('>') {
                Some(end) => end,
                // Malformed trailing tag, drop it.
                None => break,
            };
            let inner = &after[..end];
            let name: String = inner
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .flat_map(|c| c.to_lowercase())
                .collect();
            if inner.starts_with('/') {
                if let Some(pos) = open_tags.iter().rposition(|tag| *tag == name) {
                    open_tags.remove(pos);
                }
            } else if !name.is_empty() && !is_void_element(&name) && !inner.ends_with('/') {
                open_tags.push(name);
            }
            out.push('<');
            out.push_str(inner);
            out.push('>');
            in_word = false;
            rest = &after[end + 1..];
            continue;
        }

        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };
        if c.is_whitespace() {
            in_word = false;
            out.push(c);
        } else {
            if !in_word {
                if words == max_words {
                    truncated = true;
                    break;
                }
                words += 1;
                in_word = true;
            }
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    if truncated {
        while out.ends_with(char::is_whitespace) {
            out.pop();
        }
        out.push('…');
        for tag in open_tags.iter().rev() {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
    out
}
