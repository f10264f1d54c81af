//! Default style guide skeleton.
//!
//! The generator places these files into the working source directory on
//! first run; from then on the user owns and edits them.

use std::fs;
use std::io;
use std::path::Path;

/// Write the default skeleton into `src`.
///
/// No-op returning `Ok(false)` when `index.html` already exists there,
/// so user edits are never overwritten. Returns `Ok(true)` when the
/// skeleton was placed.
pub fn place(src: &Path) -> io::Result<bool> {
    if src.join("index.html").is_file() {
        return Ok(false);
    }

    fs::create_dir_all(src.join("templates"))?;
    fs::create_dir_all(src.join("css"))?;

    fs::write(src.join("index.html"), INDEX_TEMPLATE)?;
    fs::write(src.join("templates/component.html"), COMPONENT_TEMPLATE)?;
    fs::write(src.join("css/patina.css"), STYLESHEET)?;

    Ok(true)
}

pub const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Style Guide</title>
  <link rel="stylesheet" href="{{ path_to_root }}css/patina.css">
</head>
<body>
  <header class="masthead">
    <h1>Style Guide</h1>
  </header>
  <main class="index">
    {% for category, items in components|items %}
    <section class="category">
      <h2>{{ category }}</h2>
      <ul>
        {% for component in items %}
        <li><a href="{{ path_to_root }}{{ component.path }}">{{ component.name }}</a></li>
        {% endfor %}
      </ul>
    </section>
    {% endfor %}
    {% if views %}
    <section class="category">
      <h2>Views</h2>
      <ul>
        {% for view in views %}
        <li>{{ view.name }}</li>
        {% endfor %}
      </ul>
    </section>
    {% endif %}
  </main>
</body>
</html>
"##;

pub const COMPONENT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ component.name }} - Style Guide</title>
  <link rel="stylesheet" href="{{ path_to_root }}css/patina.css">
</head>
<body>
  <header class="masthead">
    <nav><a href="{{ path_to_root }}index.html">&larr; Style Guide</a></nav>
    <h1>{{ component.name }}</h1>
    <p class="category-label">{{ component.category }}</p>
  </header>
  <main class="component">
    {{ component.description }}
  </main>
</body>
</html>
"##;

pub const STYLESHEET: &str = r#"/* patina default theme */

:root {
  --content-max-width: 760px;
  --ink: #1f2430;
  --muted: #6b7280;
  --accent: #2563eb;
  --rule: #e5e7eb;
}

* {
  box-sizing: border-box;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  color: var(--ink);
  line-height: 1.6;
  margin: 0 auto;
  max-width: var(--content-max-width);
  padding: 2rem 1.5rem;
}

.masthead {
  border-bottom: 1px solid var(--rule);
  margin-bottom: 2rem;
  padding-bottom: 1rem;
}

.masthead h1 {
  margin: 0.25rem 0;
}

.category-label {
  color: var(--muted);
  margin: 0;
  text-transform: uppercase;
  font-size: 0.8rem;
  letter-spacing: 0.05em;
}

.category h2 {
  border-bottom: 1px solid var(--rule);
  padding-bottom: 0.25rem;
}

.index ul {
  list-style: none;
  padding: 0;
}

.index li {
  margin: 0.25rem 0;
}

a {
  color: var(--accent);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn places_skeleton_into_empty_directory() {
        let temp = tempdir().unwrap();

        let placed = place(temp.path()).unwrap();

        assert!(placed);
        assert!(temp.path().join("index.html").is_file());
        assert!(temp.path().join("templates/component.html").is_file());
        assert!(temp.path().join("css/patina.css").is_file());
    }

    #[test]
    fn existing_index_is_never_overwritten() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "mine").unwrap();

        let placed = place(temp.path()).unwrap();

        assert!(!placed);
        assert_eq!(
            fs::read_to_string(temp.path().join("index.html")).unwrap(),
            "mine"
        );
        assert!(!temp.path().join("templates").exists());
    }
}
