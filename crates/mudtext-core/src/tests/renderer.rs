use crate::tests::sample_inputs;
use crate::*;
use serde_json::json;

fn renderer_with(overrides: serde_json::Value) -> Renderer {
    let config = MarkupConfig::default().merged_with(&overrides).unwrap();
    Renderer::with_config(config).unwrap()
}

#[test]
fn renderer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Renderer>();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let raw = format!("{{rthread {i}");
                Renderer::shared().convert(&raw)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            format!("<span class=\"red\">thread {i}</span>")
        );
    }
}

#[test]
fn conversions_do_not_leak_state_into_each_other() {
    let renderer = Renderer::new();
    assert_eq!(renderer.convert("{rA"), "<span class=\"red\">A</span>");
    assert_eq!(renderer.convert("B{n"), "B");
    assert_eq!(renderer.convert("{hC"), "<strong>C</strong>");
    assert_eq!(renderer.convert("D{H"), "D");
}

#[test]
fn custom_palette_and_fragments() {
    let renderer = renderer_with(json!({
        "palette": { "r": "crimson", "o": "orange" },
        "backgroundPrefix": "on-",
        "highlightTag": "em",
        "linkClass": "command",
        "linkAttribute": "data-command",
        "tabWidth": 2
    }));
    assert_eq!(
        renderer.convert("{rA{[rB{oC{hD"),
        "<span class=\"crimson\">A</span><span class=\"on-crimson\">B</span>\
         <span class=\"orange\">C<em>D</em></span>"
    );
    assert_eq!(
        renderer.convert("{lcget all{ltall{le{-x"),
        "<a href=\"#\" class=\"command\" data-command=\"get all\">all</a>&nbsp;&nbsp;x"
    );
    assert_eq!(renderer.strip("{o{-x"), "  x");
}

#[test]
fn with_config_rejects_invalid_configs() {
    let config = MarkupConfig {
        tab_width: 99,
        ..MarkupConfig::default()
    };
    assert!(matches!(
        Renderer::with_config(config),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn fallback_returns_the_original_input_by_default() {
    let renderer = Renderer::new();
    let err = Error::Format(std::fmt::Error);
    assert_eq!(renderer.fallback("{r<b>", &err), "{r<b>");
}

#[test]
fn escaped_fallback_escapes_without_markup_processing() {
    let renderer = renderer_with(json!({ "fallback": "escaped" }));
    let err = Error::Format(std::fmt::Error);
    assert_eq!(
        renderer.fallback("{r<b>  x", &err),
        "{r&#60;b&#62;&#8199;&#8199;x"
    );
}

#[test]
fn truncate_uses_configured_ellipsis_and_width_rule() {
    let renderer = renderer_with(json!({ "ellipsis": "…" }));
    // Under the legacy rule `…` is a wide character.
    assert_eq!(renderer.truncate("ABCDEFG", 5, true), "ABC…");
    assert_eq!(renderer.truncate("ABCDEFG", 5, false), "ABCDE");

    let east_asian = renderer_with(json!({ "widthRule": "eastAsian", "ellipsis": "…" }));
    assert_eq!(east_asian.truncate("ABCDEFG", 5, true), "ABCD…");
    assert_eq!(east_asian.visual_width("café"), 4);
    assert_eq!(Renderer::new().visual_width("café"), 5);
}

#[test]
fn truncate_then_convert_pipeline() {
    let renderer = Renderer::new();
    let label = renderer.truncate("冒险者公会的告示板", 10, true);
    assert_eq!(label, "冒险者公..");
    assert_eq!(renderer.convert(&label), label);
}

#[test]
fn strip_matches_convert_for_plain_input() {
    let renderer = Renderer::new();
    for s in ["", "plain words", "剑与魔法"] {
        assert_eq!(renderer.strip(s), s);
        assert_eq!(renderer.convert(s), s);
    }
}

#[test]
fn strip_never_leaves_known_tokens() {
    let renderer = Renderer::new();
    for input in sample_inputs(500) {
        let text = renderer.strip(&input);
        for token in ["{r", "{G", "{[b", "{h", "{H", "{n", "{/", "{-", "{_", "{lc", "{lt", "{le"] {
            // `{{` produces a bare `{` which may legitimately precede a letter.
            if !input.contains("{{") {
                assert!(!text.contains(token), "{input:?} -> {text:?}");
            }
        }
    }
}

#[test]
fn escape_after_convert() {
    let html = convert("{yYou found $GOLD gold.{n Tax: $$2");
    let values = std::collections::HashMap::from([("$GOLD", "12")]);
    assert_eq!(
        escape::parse(&html, &values),
        "<span class=\"yellow\">You found 12 gold.</span> Tax: $2"
    );
}
