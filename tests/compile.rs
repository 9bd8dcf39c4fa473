//! End-to-end compilation behaviour over a temporary note base

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use zett_note::{Backlink, Compiler, Config, Error, NoteEngine, Renderer};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

struct Base {
    _temp_dir: TempDir,
    config: Config,
}

impl Base {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_base(temp_dir.path());
        config.ensure_dirs().unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    fn compiler(&self) -> Compiler<'_> {
        Compiler::with_renderer(&self.config.layout, Renderer::default())
    }

    fn write_note(&self, id: &str, text: &str) -> PathBuf {
        let path = self.config.layout.notes.join(id);
        fs::write(&path, text).unwrap();
        path
    }

    fn read_note(&self, id: &str) -> String {
        fs::read_to_string(self.config.layout.notes.join(id)).unwrap()
    }

    fn read_html(&self, id: &str) -> String {
        fs::read_to_string(self.config.layout.html.join(format!("{}.html", id))).unwrap()
    }
}

#[test]
fn backlink_insertion_is_idempotent() {
    let base = Base::new();
    base.write_note("B", "# Bee\n");
    let compiler = base.compiler();

    assert_eq!(compiler.ensure_backlink("A", "Ay", "B").unwrap(), Backlink::Inserted);
    let after_first = base.read_note("B");
    assert_eq!(compiler.ensure_backlink("A", "Ay", "B").unwrap(), Backlink::AlreadyPresent);
    assert_eq!(base.read_note("B"), after_first);
    assert_eq!(after_first.matches("[[Ay|A]]").count(), 1);
}

#[test]
fn compiling_a_note_links_its_targets_back() {
    let base = Base::new();
    base.write_note("B", "# Bee\n");
    base.write_note("C", "# Sea\n");
    let a = base.write_note("A", "# Ay\n\n[[Bee|B]] and [[Sea|C]] and [[Bee again|B]]\n");

    let compiled = base.compiler().compile(&a).unwrap();
    assert_eq!(compiled.backlinks_added, vec!["B".to_string(), "C".to_string()]);

    assert!(base.read_note("B").contains("[[Ay|A]]"));
    assert!(base.read_note("C").contains("[[Ay|A]]"));
    // Targets were re-rendered with the new link
    assert!(base.read_html("B").contains(r#"<a href="A.html">Ay</a>"#));
    assert!(base.read_html("C").contains(r#"<a href="A.html">Ay</a>"#));
}

#[test]
fn recompiling_the_source_changes_nothing_more() {
    let base = Base::new();
    base.write_note("B", "# Bee\n");
    let a = base.write_note("A", "# Ay\n[[Bee|B]]\n");
    let compiler = base.compiler();

    compiler.compile(&a).unwrap();
    let b_after_first = base.read_note("B");
    let compiled = compiler.compile(&a).unwrap();

    assert!(compiled.backlinks_added.is_empty());
    assert_eq!(base.read_note("B"), b_after_first);
}

#[test]
fn marker_suppresses_backlinks() {
    let base = Base::new();
    let index = "# Index\n<!-- nobacklink -->\n";
    base.write_note("idx", index);
    let a = base.write_note("A", "# Ay\nfiled under [[Index|idx]]\n");

    base.compiler().compile(&a).unwrap();
    assert_eq!(base.read_note("idx"), index);
    assert!(!base.config.layout.html.join("idx.html").exists());
}

#[test]
fn staged_image_is_relocated_exactly_once() {
    let base = Base::new();
    let layout = &base.config.layout;
    fs::write(layout.staging.join("foo.png"), PNG_BYTES).unwrap();
    let n1 = base.write_note("N1", "# With image\n\n((foo.png))\n");
    let compiler = base.compiler();

    compiler.compile(&n1).unwrap();
    assert!(layout.images.join("N1-foo.png").exists());
    assert!(!layout.staging.join("foo.png").exists());
    assert!(base.read_html("N1").contains("data:image/png;base64,"));

    // A fresh staged file of the same name must be left alone
    fs::write(layout.staging.join("foo.png"), b"GIF89a").unwrap();
    compiler.compile(&n1).unwrap();
    assert!(layout.staging.join("foo.png").exists());
    assert_eq!(fs::read(layout.images.join("N1-foo.png")).unwrap(), PNG_BYTES);
}

#[test]
fn reference_round_trips_to_hyperlink() {
    let base = Base::new();
    base.write_note("42", "# The Answer\n");
    let note = base.write_note("7", "# Seven\n\nSee [[Title|42]].\n");

    base.compiler().compile(&note).unwrap();
    assert!(base.read_html("7").contains(r#"<a href="42.html">Title</a>"#));
}

#[test]
fn title_with_pipe_uses_last_segment_as_id() {
    let base = Base::new();
    base.write_note("9", "# Nine\n");
    let note = base.write_note("1", "# One\n[[this|that|9]]\n");

    base.compiler().compile(&note).unwrap();
    assert!(base.read_html("1").contains(r#"<a href="9.html">this|that</a>"#));
    assert!(base.read_note("9").contains("[[One|1]]"));
}

#[test]
fn empty_image_marker_stays_literal() {
    let base = Base::new();
    let note = base.write_note("1", "# One\n\nempty (()) marker\n");

    base.compiler().compile(&note).unwrap();
    assert!(base.read_html("1").contains("empty (()) marker"));
    assert_eq!(fs::read_dir(&base.config.layout.images).unwrap().count(), 0);
}

#[test]
fn dangling_reference_still_compiles() {
    let base = Base::new();
    let note = base.write_note("1", "# One\n[[Ghost|404]]\n");

    let compiled = base.compiler().compile(&note).unwrap();
    assert!(compiled.backlinks_added.is_empty());
    assert!(!base.config.layout.notes.join("404").exists());
    assert!(base.read_html("1").contains(r#"href="404.html""#));
}

#[test]
fn recompile_all_isolates_failures() {
    let base = Base::new();
    base.write_note("1", "# One\n");
    base.write_note("2", "# Two\n[[One|1]]\n");
    fs::write(base.config.layout.notes.join("3"), [0xff, 0xfe, 0xfd]).unwrap();
    base.write_note("4", "# Four\n((missing.png))\n");

    let report = base.compiler().recompile_all().unwrap();
    assert_eq!(report.total(), 4);
    assert_eq!(report.compiled.len(), 2);
    assert_eq!(report.failures.len(), 2);
    assert!(base.read_html("1").contains("<title>One</title>"));
    assert!(base.read_html("2").contains(r#"<a href="1.html">One</a>"#));
    assert!(!base.config.layout.html.join("3.html").exists());
    assert!(!base.config.layout.html.join("4.html").exists());

    match report.into_result() {
        Err(Error::Aggregate { total, failures }) => {
            assert_eq!(total, 4);
            assert_eq!(failures.len(), 2);
        }
        other => panic!("expected aggregate failure, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn stylesheet_is_embedded() {
    let base = Base::new();
    fs::write(base.config.layout.meta.join("style.css"), "body { color: red; }").unwrap();
    let note = base.write_note("1", "# Styled\n");

    let compiler = NoteEngine::new(&base.config).compiler().unwrap();
    compiler.compile(&note).unwrap();
    let html = base.read_html("1");
    assert!(html.contains("<style>"));
    assert!(html.contains("body { color: red; }"));
}

#[test]
fn draft_lifecycle() {
    let base = Base::new();
    let engine = NoteEngine::new(&base.config);
    base.write_note("intro", "# Intro\n");

    let path = engine.drafts().create().unwrap();
    fs::write(&path, "# Fresh thought\n\nbuilds on [[Intro|intro]]\n").unwrap();

    let draft = engine.drafts().list().unwrap().remove(0);
    let compiler = engine.compiler().unwrap();
    let compiled = engine.drafts().finish(&draft, &compiler).unwrap();

    assert_eq!(compiled.title, "Fresh thought");
    assert!(engine.drafts().list().unwrap().is_empty());
    assert_eq!(engine.notes().list().unwrap().len(), 2);
    assert!(base.read_note("intro").contains(&format!("[[Fresh thought|{}]]", compiled.id)));

    engine.notes().delete(&compiled.id).unwrap();
    assert_eq!(engine.notes().list().unwrap().len(), 1);
}

#[test]
fn unlinkable_file_names_never_pile_up_backlinks() {
    let base = Base::new();
    base.write_note("B", "# Bee\n");
    let compiler = base.compiler();

    for file_name in ["a|b", "A "] {
        let source = base.write_note(file_name, "# Ay\n[[Bee|B]]\n");
        for _ in 0..3 {
            let compiled = compiler.compile(&source).unwrap();
            assert!(compiled.backlinks_added.is_empty());
        }
    }
    assert_eq!(base.read_note("B"), "# Bee\n");
}

#[test]
fn backlink_stays_committed_when_source_fails_later() {
    let base = Base::new();
    base.write_note("B", "# Bee\n");
    let a = base.write_note("A", "# Ay\n[[Bee|B]]\n((missing.png))\n");

    let err = base.compiler().compile(&a).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(base.read_note("B"), "# Bee\n- [[Ay|A]]\n");
    assert!(!base.config.layout.html.join("A.html").exists());
}

#[test]
fn failed_target_render_aborts_source_compile() {
    let base = Base::new();
    base.write_note("B", "# Bee\n((gone.png))\n");
    let a = base.write_note("A", "# Ay\n[[Bee|B]]\n");

    let err = base.compiler().compile(&a).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(base.read_note("B"), "# Bee\n((gone.png))\n- [[Ay|A]]\n");
    assert!(!base.config.layout.html.join("A.html").exists());
    assert!(!base.config.layout.html.join("B.html").exists());
}
