//! Positional message templates.
//!
//! Catalog message templates carry percent-style positional directives
//! (`%s`, `%d`, `%v`, ...). [`render`] substitutes arguments left to right;
//! [`requires_arguments`] is the detection used at generation time to decide
//! whether an entry gets an argument-taking constructor.
//!
//! Rendering is total. Malformed directives, missing arguments, and surplus
//! arguments all degrade to verbatim output rather than failing.

/// Conversion letters recognized after a `%`.
const VERBS: &str = "vTtbcdoqxXUeEfFgGsp";

/// Substitutes `args` into `template` left to right.
///
/// `%%` renders a literal `%`. A recognized directive with no remaining
/// argument, an unrecognized directive, and a trailing `%` are all emitted
/// verbatim; surplus arguments are ignored.
///
/// # Example
///
/// ```
/// use klaxon::template::render;
///
/// let out = render("Missing Parameter: %s", &["UserId".to_string()]);
/// assert_eq!(out, "Missing Parameter: UserId");
/// ```
pub fn render(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(&verb) if VERBS.contains(verb) && next_arg < args.len() => {
                chars.next();
                out.push_str(&args[next_arg]);
                next_arg += 1;
            }
            Some(&other) => {
                chars.next();
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Reports whether `template` contains at least one argument directive.
///
/// `%%` escapes are stripped before scanning, and a trailing `%` with no
/// following character does not count as a directive.
pub fn requires_arguments(template: &str) -> bool {
    let stripped = template.replace("%%", "");
    let mut chars = stripped.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            if let Some(&next) = chars.peek() {
                if VERBS.contains(next) {
                    return true;
                }
            }
        }
    }
    false
}
