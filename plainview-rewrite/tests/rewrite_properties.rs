use plainview_rewrite::{
    Document, Element, RESET_TAGS, RewritePolicy, Rewriter, apply_link_quota, strip_active_content,
};

fn rewrite(html: &str) -> Document {
    let out = Rewriter::default().rewrite(html).expect("rewrite");
    Document::parse(&out.html)
}

fn hrefs(doc: &Document) -> Vec<Option<String>> {
    doc.find_all("a")
        .map(|a| a.attr("href").map(str::to_string))
        .collect()
}

/// Longest run of live links between two reset elements, in document order.
fn longest_live_run(doc: &Document) -> usize {
    let mut run = 0;
    let mut longest = 0;
    for element in doc.elements() {
        if element.tag() == "a" && element.attr("href").is_some() {
            run += 1;
            longest = longest.max(run);
        } else if RESET_TAGS.contains(&element.tag()) {
            run = 0;
        }
    }
    longest
}

#[test]
fn scenario_script_removed_and_fourth_link_defanged() {
    let doc = rewrite(
        r#"<script>x</script><p>t</p><a href="1">1</a><a href="2">2</a><a href="3">3</a><a href="4">4</a>"#,
    );
    assert_eq!(doc.find_all("script").count(), 0);
    assert_eq!(
        hrefs(&doc),
        [
            Some("1".to_string()),
            Some("2".to_string()),
            Some("3".to_string()),
            None
        ]
    );
}

#[test]
fn scenario_heading_resets_before_fourth_link() {
    let doc = rewrite(
        r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a><h2>X</h2><a href="4">4</a>"#,
    );
    assert!(hrefs(&doc).iter().all(Option::is_some));
    assert_eq!(doc.find_all("a").count(), 4);
}

#[test]
fn removal_is_idempotent() {
    let mut doc = Document::parse(
        r#"<html><head><script>a</script><style>b</style><link rel="icon" href="i">
           <link rel="stylesheet" href="s.css"></head>
           <body><div><script>c</script><noscript>n</noscript></div></body></html>"#,
    );
    assert_eq!(strip_active_content(&mut doc), 4);
    let html = doc.to_html().unwrap();

    let mut reparsed = Document::parse(&html);
    assert_eq!(strip_active_content(&mut reparsed), 0);
    assert_eq!(reparsed.find_all("link").count(), 1);
}

#[test]
fn stylesheet_link_survives_unmodified_and_icon_is_removed() {
    let out = Rewriter::default()
        .rewrite(r#"<head><link rel="stylesheet" href="a.css"><link rel="icon" href="b.ico"></head>"#)
        .unwrap();
    assert!(out.html.contains(r#"<link rel="stylesheet" href="a.css">"#));
    assert!(!out.html.contains("b.ico"));
    assert_eq!(out.stats.removed, 1);
}

#[test]
fn paragraph_between_third_and_fourth_link_keeps_fourth_live() {
    let without = rewrite(r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a><a href="4">4</a>"#);
    assert_eq!(hrefs(&without)[3], None);

    let with = rewrite(
        r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a><p></p><a href="4">4</a>"#,
    );
    assert_eq!(hrefs(&with)[3].as_deref(), Some("4"));
}

#[test]
fn wrapping_in_containers_does_not_change_the_quota() {
    let flat = rewrite(
        r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a><a href="4">4</a><a href="5">5</a>"#,
    );
    let wrapped = rewrite(
        r#"<nav><div><ul>
             <li><span><a href="1">1</a></span></li>
             <li><a href="2">2</a></li>
           </ul></div><ol><li><a href="3">3</a></li><li><a href="4">4</a></li></ol>
           <div><a href="5">5</a></div></nav>"#,
    );
    assert_eq!(hrefs(&flat), hrefs(&wrapped));
}

#[test]
fn live_runs_never_exceed_quota() {
    let page = r#"<!DOCTYPE html>
<html><head><title>t</title><script>track()</script></head>
<body>
  <header><nav><a href="/">Home</a> | <a href="/news">News</a> | <a href="/sport">Sport</a>
    | <a href="/weather">Weather</a> | <a href="/shop">Shop</a></nav></header>
  <main>
    <article><h1>Title</h1>
      <p>Intro with <a href="/ref1">a ref</a> and <a href="/ref2">another</a>.</p>
      <ul><li><a href="/x1">x1</a></li><li><a href="/x2">x2</a></li><li><a href="/x3">x3</a></li>
          <li><a href="/x4">x4</a></li></ul>
      <img src="pic.png" alt="pic"><a href="/after-img">after</a>
      <table><tr><td><a href="/t1">t1</a><a href="/t2">t2</a><a href="/t3">t3</a><a href="/t4">t4</a></td></tr></table>
    </article>
  </main>
  <footer><a href="/a">a</a><a href="/b">b</a><a href="/c">c</a><a href="/d">d</a><a href="/e">e</a>
    <hr><a href="/legal">legal</a></footer>
</body></html>"#;

    let doc = rewrite(page);
    assert!(longest_live_run(&doc) <= 3);
    assert_eq!(doc.find_all("script").count(), 0);
    assert_eq!(doc.find_all("a").count(), 22);

    let live: Vec<String> = doc
        .find_all("a")
        .filter(|a| a.attr("href").is_some())
        .map(Element::text_content)
        .collect();
    assert_eq!(
        live,
        [
            "Home", "News", "Sport", "a ref", "another", "x1", "after", "t1", "t2", "t3",
            "legal"
        ]
    );
}

#[test]
fn text_and_other_attributes_survive_defanging() {
    let out = Rewriter::default()
        .rewrite(r#"<a href="1">1</a><a href="2">2</a><a href="3">3</a><a id="four" href="4" title="t">four &amp; more</a>"#)
        .unwrap();
    assert!(out.html.contains(r#"<a id="four" title="t">four &amp; more</a>"#));
    assert_eq!(out.stats.defanged, 1);
}

#[test]
fn custom_policy_is_honoured() {
    let rewriter = Rewriter::new(RewritePolicy { link_quota: 1 });
    let out = rewriter
        .rewrite(r#"<a href="1">1</a><a href="2">2</a><br><a href="3">3</a>"#)
        .unwrap();
    assert_eq!(out.stats.defanged, 1);
    assert!(out.html.contains(r#"<a>2</a><br><a href="3">3</a>"#));
}

#[test]
fn apply_matches_the_individual_passes() {
    let html = r#"<style>x</style><a href="1">1</a><link rel="preload"><a href="2">2</a><a href="3">3</a><a href="4">4</a>"#;

    let mut by_rewriter = Document::parse(html);
    let stats = Rewriter::default().apply(&mut by_rewriter);

    let mut by_hand = Document::parse(html);
    let removed = strip_active_content(&mut by_hand);
    let defanged = apply_link_quota(&mut by_hand, 3);

    assert_eq!(by_rewriter, by_hand);
    assert_eq!((stats.removed, stats.defanged), (removed, defanged));
}

#[test]
fn comments_are_passed_through() {
    let out = Rewriter::default()
        .rewrite("<body><!-- keep me --><p>x</p></body>")
        .unwrap();
    assert!(out.html.contains("<!-- keep me -->"));
}

#[test]
fn deeply_nested_page_is_rewritten_on_a_small_stack() {
    const DEPTH: usize = 20_000;
    // Matches the default stack of a tokio blocking-pool thread.
    let worker = std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(|| {
            let html = format!(
                r#"{}<script>x</script><a href="1">1</a><a href="2">2</a><a href="3">3</a><a href="4">4</a>"#,
                "<div>".repeat(DEPTH)
            );
            Rewriter::default().rewrite(&html)
        })
        .expect("spawn worker");

    let out = worker
        .join()
        .expect("worker finished without overflowing")
        .expect("rewrite");
    assert_eq!(out.stats.removed, 1);
    assert_eq!(out.stats.defanged, 1);
    assert_eq!(out.html.matches("<div>").count(), DEPTH);
    assert!(out.html.contains(r#"<a href="3">3</a><a>4</a>"#));
}
