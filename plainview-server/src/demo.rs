use axum::response::Html;

/// Served unmodified at `/f/` so the policy can be compared against a page
/// that uses most common elements.
pub const DEMO_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>plainview demo page</title>
  <style>
    body { font-family: sans-serif; max-width: 48rem; margin: 0 auto; padding: 1rem; }
    section { border-top: 1px solid #ccc; padding: .5rem 0; }
    table, th, td { border: 1px solid #999; border-collapse: collapse; padding: .25rem; }
  </style>
</head>
<body>
<header>
  <h1>plainview demo page</h1>
  <nav>
    <a href="#text">Text</a> |
    <a href="#lists">Lists</a> |
    <a href="#forms">Forms</a> |
    <a href="#tables">Tables</a> |
    <a href="#media">Media</a>
  </nav>
</header>
<main>
<section id="text">
  <h2>Text</h2>
  <p><b>bold</b>, <strong>strong</strong>, <i>italic</i>, <em>em</em>,
     <mark>mark</mark>, <small>small</small>, <del>deleted</del>,
     <ins>inserted</ins>, H<sub>2</sub>O, E = mc<sup>2</sup></p>
  <blockquote>A block quotation.</blockquote>
  <p><q>An inline quotation</q> and <abbr title="HyperText Markup Language">HTML</abbr>.</p>
  <pre>fn main() {
    println!("preformatted");
}</pre>
  <p><code>inline code</code>, <kbd>Ctrl</kbd>+<kbd>C</kbd>, <cite>A cited work</cite></p>
  <address>Somewhere on the internet</address>
</section>
<section id="lists">
  <h2>Lists</h2>
  <ul><li>Unordered item</li><li>Unordered item</li></ul>
  <ol><li>Ordered item</li><li>Ordered item</li></ol>
  <dl><dt>Term</dt><dd>Definition</dd></dl>
</section>
<section id="links">
  <h2>Links and buttons</h2>
  <a href="https://example.com/one">One</a>
  <a href="https://example.com/two">Two</a>
  <a href="https://example.com/three">Three</a>
  <a href="https://example.com/four">Four</a>
  <a href="https://example.com/five">Five</a><br>
  <a href="https://example.com/after-break">After a line break</a><br>
  <button type="button">Button</button>
</section>
<section id="forms">
  <h2>Forms</h2>
  <form action="#" method="get">
    <label>Text <input type="text" name="t"></label><br>
    <label>Password <input type="password" name="p"></label><br>
    <label>Email <input type="email" name="e"></label><br>
    <label>Number <input type="number" name="n"></label><br>
    <label>Date <input type="date" name="d"></label><br>
    <label><input type="checkbox" name="c"> Checkbox</label><br>
    <label><input type="radio" name="r"> Radio</label><br>
    <select name="s"><option>First</option><option>Second</option></select><br>
    <textarea name="a" rows="3" cols="30"></textarea><br>
    <input type="submit"> <input type="reset">
  </form>
</section>
<section id="tables">
  <h2>Tables</h2>
  <table>
    <caption>Sample table</caption>
    <thead><tr><th>A</th><th>B</th></tr></thead>
    <tbody><tr><td>1</td><td>2</td></tr></tbody>
    <tfoot><tr><td colspan="2">Footer row</td></tr></tfoot>
  </table>
</section>
<section id="media">
  <h2>Media</h2>
  <figure>
    <img src="https://example.com/image.png" alt="An example image" width="150">
    <figcaption>A figure caption</figcaption>
  </figure>
  <audio controls></audio>
  <video controls width="200"></video>
</section>
<section id="interactive">
  <h2>Interactive</h2>
  <details><summary>Details</summary>Hidden until opened.</details>
  <progress value="50" max="100"></progress>
  <meter value="0.7"></meter>
</section>
<article>
  <h2>Semantics</h2>
  <p>An article with an <time datetime="2026-01-01">ISO date</time>.</p>
  <aside>An aside.</aside>
</article>
</main>
<footer><hr><p>Footer</p></footer>
</body>
</html>
"##;

pub(crate) async fn demo_page() -> Html<&'static str> {
    Html(DEMO_PAGE)
}
