//! Minimal HTML-to-text extraction.
//!
//! Not a parser: tags are scanned for their names only, which is enough to
//! drop non-visible containers and keep the readable text in order.

/// Elements whose content is never visible text.
const HIDDEN: &[&str] = &["script", "style", "noscript"];

/// Visible text of `html`: hidden elements dropped, text nodes joined with
/// spaces, entities decoded and whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
  let mut chunks: Vec<String> = Vec::new();
  let mut text = String::new();
  let mut rest = html;

  while let Some(lt) = rest.find('<') {
    text.push_str(&rest[..lt]);
    rest = &rest[lt..];

    if !opens_markup(rest) {
      text.push('<');
      rest = &rest[1..];
      continue;
    }
    chunks.push(decode_entities(&text));
    text.clear();

    if let Some(comment) = rest.strip_prefix("<!--") {
      rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
      continue;
    }

    let Some(gt) = rest.find('>') else {
      rest = "";
      break;
    };
    let tag = &rest[1..gt];
    rest = &rest[gt + 1..];

    if tag.starts_with('/') || tag.ends_with('/') {
      continue;
    }
    let name = tag_name(tag);
    if let Some(hidden) = HIDDEN.iter().find(|h| name.eq_ignore_ascii_case(h)) {
      rest = skip_element(rest, hidden);
    }
  }
  text.push_str(rest);
  chunks.push(decode_entities(&text));

  collapse_whitespace(&chunks.join(" "))
}

/// A `<` starts markup only when followed by a tag name, `/`, `!` or `?`;
/// otherwise it is literal text such as `5 < 6`.
fn opens_markup(rest: &str) -> bool {
  rest[1..]
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Skip past the closing tag of `name`; content inside is raw text and may
/// contain `<` or `>`.
fn skip_element<'a>(rest: &'a str, name: &str) -> &'a str {
  let lower = rest.to_ascii_lowercase();
  let Some(close) = lower.find(&format!("</{name}")) else {
    return "";
  };
  match rest[close..].find('>') {
    Some(gt) => &rest[close + gt + 1..],
    None => "",
  }
}

fn tag_name(tag: &str) -> &str {
  let end = tag
    .find(|c: char| c.is_whitespace() || c == '/')
    .unwrap_or(tag.len());
  &tag[..end]
}

/// Replace runs of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode named entities common in product copy plus numeric references.
/// Unknown entities are left as written.
pub fn decode_entities(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut rest = text;

  while let Some(amp) = rest.find('&') {
    out.push_str(&rest[..amp]);
    rest = &rest[amp..];

    let decoded = rest
      .find(';')
      .filter(|&semi| semi <= 10)
      .and_then(|semi| entity(&rest[1..semi]).map(|c| (c, semi)));
    match decoded {
      Some((c, semi)) => {
        out.push(c);
        rest = &rest[semi + 1..];
      }
      None => {
        out.push('&');
        rest = &rest[1..];
      }
    }
  }
  out.push_str(rest);
  out
}

fn entity(name: &str) -> Option<char> {
  if let Some(num) = name.strip_prefix('#') {
    let code = match num.strip_prefix(['x', 'X']) {
      Some(hex) => u32::from_str_radix(hex, 16).ok()?,
      None => num.parse().ok()?,
    };
    return char::from_u32(code);
  }
  Some(match name {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
    "ndash" => '\u{2013}',
    "mdash" => '\u{2014}',
    "lsquo" => '\u{2018}',
    "rsquo" => '\u{2019}',
    "ldquo" => '\u{201c}',
    "rdquo" => '\u{201d}',
    "hellip" => '\u{2026}',
    "copy" => '\u{a9}',
    "reg" => '\u{ae}',
    "trade" => '\u{2122}',
    "deg" => '\u{b0}',
    "eacute" => '\u{e9}',
    _ => return None,
  })
}
