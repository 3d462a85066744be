//! End-to-end conversion tests.
//!
//! Each test feeds DocBook markup through the full pipeline (load, translate,
//! normalize) and checks the emitted AsciiDoc plus the side tables and
//! diagnostics.

use doklet::translate::DiagnosticKind;
use doklet::{Conversion, Document, Error, StyleConfig, convert};

fn convert_str(xml: &str) -> Conversion {
    let doc = Document::from_xml_str(xml).expect("parse failed");
    convert(&doc, &StyleConfig::default()).expect("conversion failed")
}

fn leftover_count(conversion: &Conversion) -> usize {
    conversion
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::LeftoverText)
        .count()
}

// ============================================================================
// Inline emphasis and normalization
// ============================================================================

#[test]
fn emphasis_in_paragraph_renders_bold() {
    let conversion = convert_str("<para>Hello <emphasis>world</emphasis>.</para>");
    let master = conversion.output.master();
    assert!(master.contains("Hello *world*."), "got: {master}");
    assert!(!master.contains("pass:attributes"), "got: {master}");
    assert_eq!(leftover_count(&conversion), 0);
}

#[test]
fn nested_same_category_emphasis_is_not_requoted() {
    let conversion =
        convert_str("<para><emphasis>all <emphasis>bold</emphasis></emphasis></para>");
    let master = conversion.output.master();
    assert!(master.contains("*all bold*"), "got: {master}");
}

#[test]
fn monospace_kind_uses_backticks() {
    let conversion = convert_str("<para>run <command>make</command> now</para>");
    let master = conversion.output.master();
    assert!(master.contains("run [command]`make` now"), "got: {master}");
}

#[test]
fn superscript_keeps_protective_markers_between_words() {
    let conversion = convert_str("<para>E=mc<superscript>2</superscript></para>");
    let master = conversion.output.master();
    // No separator next to the quote, so the zero-width marker must stay.
    assert!(
        master.contains("E=mcpass:attributes[{blank}]^2^"),
        "got: {master}"
    );
}

// ============================================================================
// Sectioning and headings
// ============================================================================

#[test]
fn chapter_heading_with_anchor() {
    let conversion = convert_str(
        "<book><chapter id=\"ch1\"><title>One</title><para>body</para></chapter></book>",
    );
    let master = conversion.output.master();
    assert!(master.contains("[[ch1]]\n== One"), "got: {master}");
    assert!(master.contains("body"));
}

#[test]
fn heading_depth_saturates_to_block_title() {
    let mut xml = String::from("<book>");
    for i in 1..=6 {
        if i == 1 {
            xml.push_str(&format!("<chapter><title>S{i}</title>"));
        } else {
            xml.push_str(&format!("<section><title>S{i}</title>"));
        }
    }
    xml.push_str("<para>deep</para>");
    for i in (1..=6).rev() {
        xml.push_str(if i == 1 { "</chapter>" } else { "</section>" });
    }
    xml.push_str("</book>");

    let conversion = convert_str(&xml);
    let master = conversion.output.master();
    // Five levels of ancestors-with-titles still fit the heading syntax.
    assert!(master.contains("====== S5"), "got: {master}");
    // The sixth does not; it degrades to a block-title paragraph.
    assert!(master.contains(".S6"), "got: {master}");
    assert!(!master.contains("======= "), "got: {master}");
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn list_items_nest_by_repeating_bullets() {
    let conversion = convert_str(
        "<itemizedlist><listitem><para>outer</para>\
         <itemizedlist><listitem><para>inner</para></listitem></itemizedlist>\
         </listitem></itemizedlist>",
    );
    let master = conversion.output.master();
    assert!(master.contains("* outer"), "got: {master}");
    assert!(master.contains("** inner"), "got: {master}");
}

#[test]
fn blank_line_inside_fence_gets_no_continuation_marker() {
    let conversion = convert_str(
        "<itemizedlist><listitem><para>intro</para>\
         <screen>code\n\nmore</screen>\
         <para>after</para></listitem></itemizedlist>",
    );
    let master = conversion.output.master();
    // Inside the ---- fence the blank line stays literal.
    assert!(master.contains("code\n\nmore"), "got: {master}");
    // Outside it, the list continuation marker appears.
    assert!(master.contains("----\n+\nafter"), "got: {master}");
}

#[test]
fn description_list_renders_terms() {
    let conversion = convert_str(
        "<variablelist><varlistentry><term>opt</term>\
         <listitem><para>desc</para></listitem></varlistentry></variablelist>",
    );
    let master = conversion.output.master();
    assert!(master.contains("opt::"), "got: {master}");
    assert!(master.contains("desc"), "got: {master}");
}

#[test]
fn item_starting_with_punctuation_gets_blank_placeholder() {
    // The item's content opens with a literal-block fence; anchoring it on a
    // placeholder line keeps the renderer from misreading the leading dashes.
    let conversion = convert_str(
        "<itemizedlist><listitem><screen>a * b</screen></listitem></itemizedlist>",
    );
    let master = conversion.output.master();
    assert!(master.contains("* {blank}\n+\n----"), "got: {master}");
}

// ============================================================================
// Entities
// ============================================================================

#[test]
fn entity_forward_references_resolve() {
    let conversion = convert_str(
        "<!DOCTYPE book [\n<!ENTITY A \"&B; tool\">\n<!ENTITY B \"doklet\">\n]>\n\
         <book><para>&A;</para></book>",
    );
    assert_eq!(
        conversion.output.entities.get("A").map(String::as_str),
        Some("doklet tool")
    );
    assert!(conversion.output.master().contains("{A}"));
    assert_eq!(leftover_count(&conversion), 0);
}

#[test]
fn entity_references_rewrite_to_attribute_syntax() {
    let conversion = convert_str(
        "<!DOCTYPE book [<!ENTITY PRODUCT \"Widget\">]>\
         <book><para>&PRODUCT; rocks</para></book>",
    );
    assert!(conversion.output.master().contains("{PRODUCT} rocks"));
}

// ============================================================================
// Conditional filtering
// ============================================================================

#[test]
fn unmatched_condition_discards_whole_subtree() {
    let mut doc = Document::from_xml_str(
        "<book><para condition=\"beta\">hidden <emphasis condition=\"ga\">even this</emphasis></para>\
         <para condition=\"ga\">shown</para></book>",
    )
    .unwrap();
    let mut cfg = std::collections::HashMap::new();
    cfg.insert("condition".to_string(), "ga".to_string());
    doc.publican_cfg = Some(cfg);

    let conversion = convert(&doc, &StyleConfig::default()).unwrap();
    let master = conversion.output.master();
    assert!(!master.contains("hidden"));
    assert!(!master.contains("even this"));
    assert!(master.contains("shown"));
    // Discarded content is accounted for, not leftover.
    assert_eq!(leftover_count(&conversion), 0);
}

#[test]
fn conditioned_nodes_drop_when_document_has_no_conditions() {
    let conversion = convert_str("<book><para condition=\"beta\">x</para><para>y</para></book>");
    assert!(!conversion.output.master().contains('x'));
    assert!(conversion.output.master().contains('y'));
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn table_with_header_row_sets_options() {
    let conversion = convert_str(
        "<table><title>T</title><tgroup>\
         <thead><row><entry>h1</entry><entry>h2</entry></row></thead>\
         <tbody><row><entry>a</entry><entry>b</entry></row></tbody>\
         </tgroup></table>",
    );
    let master = conversion.output.master();
    assert!(master.contains("[options=\"header\"]"), "got: {master}");
    assert!(master.contains("|==="), "got: {master}");
    assert!(master.contains("|h1"), "got: {master}");
    assert!(master.contains("|a"), "got: {master}");
}

#[test]
fn ragged_row_gets_column_span_prefix() {
    let conversion = convert_str(
        "<table><title>T</title><tgroup><tbody>\
         <row><entry>a</entry><entry>b</entry><entry>c</entry></row>\
         <row><entry>totals</entry></row>\
         </tbody></tgroup></table>",
    );
    let master = conversion.output.master();
    assert!(master.contains("3+|totals"), "got: {master}");
}

#[test]
fn table_cell_outside_tgroup_is_fatal() {
    let doc = Document::from_xml_str("<row><entry>stray</entry></row>").unwrap();
    let result = convert(&doc, &StyleConfig::default());
    assert!(matches!(result, Err(Error::Structure(_))));
}

// ============================================================================
// Links, references, media
// ============================================================================

#[test]
fn xref_renders_angle_reference() {
    let conversion = convert_str("<para>See <xref linkend=\"ch1\"/>.</para>");
    assert!(conversion.output.master().contains("See <<ch1>>."));
}

#[test]
fn link_with_text_renders_labelled_reference() {
    let conversion = convert_str("<para><link linkend=\"ch1\">the chapter</link></para>");
    assert!(conversion.output.master().contains("<<ch1,the chapter>>"));
}

#[test]
fn ulink_with_custom_child_prerenders_link() {
    let conversion =
        convert_str("<para><ulink url=\"http://x\"><command>go</command></ulink></para>");
    let master = conversion.output.master();
    assert!(
        master.contains("[command]`link:++http://x++[go]`"),
        "got: {master}"
    );
}

#[test]
fn mediaobject_references_image_and_registers_resource() {
    let conversion = convert_str(
        "<mediaobject><imageobject><imagedata fileref=\"images/i.png\"/></imageobject>\
         <textobject>alt text</textobject></mediaobject>",
    );
    let master = conversion.output.master();
    assert!(master.contains("image::images/i.png[alt text]"), "got: {master}");
    assert!(conversion.output.resources.contains_key("images/i.png"));
}

#[test]
fn indexterm_collects_terms_without_leftovers() {
    let conversion = convert_str(
        "<para><indexterm><primary>Foo</primary><secondary>Bar</secondary></indexterm></para>",
    );
    assert!(conversion.output.master().contains("indexterm:[Foo,Bar]"));
    assert_eq!(leftover_count(&conversion), 0);
}

// ============================================================================
// Admonitions, metadata, keywords
// ============================================================================

#[test]
fn admonitions_render_as_fenced_blocks() {
    let conversion = convert_str("<note><para>careful</para></note>");
    let master = conversion.output.master();
    assert!(master.contains("[NOTE]"), "got: {master}");
    assert!(master.contains("====\n\ncareful\n\n===="), "got: {master}");
}

#[test]
fn bookinfo_yields_document_title_metadata_and_keywords() {
    let conversion = convert_str(
        "<book><bookinfo><title>My Book</title>\
         <productname>Widget</productname>\
         <keywordset><keyword>cli</keyword></keywordset>\
         </bookinfo></book>",
    );
    assert!(conversion.output.master().starts_with("= My Book"));
    assert!(
        conversion
            .output
            .metadata
            .iter()
            .any(|m| m.contains("<productname>Widget</productname>"))
    );
    assert!(conversion.output.keywords.contains("cli"));
    assert_eq!(leftover_count(&conversion), 0);
}

#[test]
fn remark_becomes_comment_line() {
    let conversion = convert_str("<book><remark>fix me later</remark><para>x</para></book>");
    assert!(conversion.output.master().contains("//fix me later"));
}

// ============================================================================
// Literal blocks
// ============================================================================

#[test]
fn quote_safe_screen_gets_quotes_substitution() {
    let conversion = convert_str("<screen>ls &lt;dir&gt;</screen>");
    let master = conversion.output.master();
    assert!(master.contains("[subs=\"quotes\"]"), "got: {master}");
    assert!(master.contains("----\nls &lt;dir&gt;\n----"), "got: {master}");
}

#[test]
fn sensitive_screen_content_skips_quotes_substitution() {
    let conversion = convert_str("<screen>a * b</screen>");
    let master = conversion.output.master();
    assert!(!master.contains("[subs"), "got: {master}");
    assert!(master.contains("----\na * b\n----"), "got: {master}");
}

#[test]
fn emphasis_inside_unsafe_screen_uses_pass_escape() {
    let conversion = convert_str("<screen>x * y <emphasis>bold</emphasis></screen>");
    let master = conversion.output.master();
    assert!(master.contains("pass:quotes[*bold*]"), "got: {master}");
}

// ============================================================================
// Completeness and diagnostics
// ============================================================================

#[test]
fn fully_recognized_document_has_no_diagnostics() {
    let conversion = convert_str(
        "<book><chapter id=\"c1\"><title>One</title>\
         <para>Some <emphasis>rich</emphasis> text with <command>cmd</command>.</para>\
         <itemizedlist><listitem><para>item</para></listitem></itemizedlist>\
         <note><para>hint</para></note>\
         </chapter></book>",
    );
    assert!(
        conversion.diagnostics.is_empty(),
        "got: {:?}",
        conversion.diagnostics
    );
    for needle in ["== One", "*rich*", "`cmd`", "* item", "[NOTE]"] {
        assert!(
            conversion.output.master().contains(needle),
            "missing {needle} in: {}",
            conversion.output.master()
        );
    }
}

#[test]
fn unknown_markup_is_translated_best_effort_and_reported() {
    let conversion = convert_str("<glossary><glossentry>term text</glossentry></glossary>");
    assert!(conversion.output.master().contains("term text"));
    assert!(
        conversion
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnknownMarkup)
    );
}

#[test]
fn broken_inclusion_title_is_hoisted() {
    // A title directly under an include must attach to the surrounding
    // container instead.
    let conversion = convert_str(
        "<book><chapter><include href=\"missing.xml\"><title>Hoisted</title>\
         <para>kept</para></include></chapter></book>",
    );
    let master = conversion.output.master();
    assert!(master.contains("== Hoisted"), "got: {master}");
}

// ============================================================================
// End-to-end with the writer
// ============================================================================

#[test]
fn conversion_writes_master_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let conversion = convert_str("<book><para>content</para></book>");
    conversion.output.write(dir.path()).unwrap();
    let master = std::fs::read_to_string(dir.path().join("master.adoc")).unwrap();
    assert!(master.starts_with(":experimental:\n:doctype: book\n"));
    assert!(master.contains("content"));
    assert!(dir.path().join("entities.adoc").is_file());
}
