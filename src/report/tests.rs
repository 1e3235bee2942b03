use serde_json::json;

use super::*;
use crate::model::QualityMetrics;

fn parser() -> ReportParser {
    ReportParser::new().expect("parser regexes compile")
}

fn section(title: &str, content: &str) -> ReportSection {
    ReportSection::new(title, content)
}

#[test]
fn structured_sections_keep_count_order_and_defaults() {
    let payload = json!({
        "sections": [
            { "title": "  1. 시장 규모 ", "content": "약 100억 달러" },
            { "content": "제목 없는 섹션" },
            { "title": "Risks" }
        ]
    });

    let sections = parser().parse_complex_content(&payload);
    assert_eq!(
        sections,
        vec![
            section("1. 시장 규모", "약 100억 달러"),
            section("섹션 2", "제목 없는 섹션"),
            section("Risks", ""),
        ]
    );
}

#[test]
fn structured_titles_keep_leading_digits_and_symbols() {
    let payload = json!({
        "sections": [
            { "title": "2030 Outlook", "content": "a" },
            { "title": "5G 시장", "content": "b" },
            { "name": "-10% 하락 리스크", "content": "c" },
            { "title": "   ", "content": "d" }
        ]
    });

    let titles = parser()
        .parse_complex_content(&payload)
        .into_iter()
        .map(|section| section.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["2030 Outlook", "5G 시장", "-10% 하락 리스크", "섹션 4"]);
}

#[test]
fn structured_sections_accept_name_and_serialize_non_text_content() {
    let payload = json!({
        "analysis": {
            "sections": [
                { "name": "경쟁 현황", "content": { "competitors": 3 } }
            ]
        }
    });

    let sections = parser().parse_complex_content(&payload);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "경쟁 현황");
    assert!(sections[0].content.contains("\"competitors\": 3"));
}

#[test]
fn analysis_sections_take_priority_over_raw_analysis() {
    let payload = json!({
        "analysis": { "sections": [{ "title": "T", "content": "c" }] },
        "rawAnalysis": "## X\ny"
    });

    let sections = parser().parse_complex_content(&payload);
    assert_eq!(sections, vec![section("T", "c")]);
}

#[test]
fn heading_text_splits_into_exact_slices() {
    let sections = parser().parse_complex_content(&json!("## Market Size\nLarge.\n## Risks\nNone."));
    assert_eq!(
        sections,
        vec![section("Market Size", "Large."), section("Risks", "None.")]
    );
}

#[test]
fn heading_titles_lose_numbering_and_crlf_is_normalized() {
    let text = "# 1. 개요\r\n첫 줄\r\n둘째 줄\r\n### 2.1 세부\r\n내용";
    let sections = parser().parse_raw_analysis(text);
    assert_eq!(
        sections,
        vec![section("개요", "첫 줄\n둘째 줄"), section("세부", "내용")]
    );
}

#[test]
fn four_hashes_are_not_a_heading() {
    let sections = parser().parse_raw_analysis("#### 깊은 제목\n본문\n\n둘째 문단\n내용");
    assert_eq!(
        sections,
        vec![section("깊은 제목", "본문"), section("둘째 문단", "내용")]
    );
}

#[test]
fn numbered_lines_start_sections_and_keep_empty_content() {
    let text = "1. Overview\nfirst line\n\nsecond line\n2. Empty\n3. Risks\nlow";
    let sections = parser().parse_raw_analysis(text);
    assert_eq!(
        sections,
        vec![
            section("Overview", "first line\nsecond line"),
            section("Empty", ""),
            section("Risks", "low"),
        ]
    );
}

#[test]
fn single_short_paragraph_round_trips() {
    let sections = parser().parse_complex_content(&json!("  시장 전망은 긍정적입니다  "));
    assert_eq!(
        sections,
        vec![section("시장 전망은 긍정적입니다", "시장 전망은 긍정적입니다")]
    );
}

#[test]
fn long_first_line_gets_synthesized_title() {
    let text = "This paragraph has a very long first line that definitely exceeds fifty characters in total.";
    let sections = parser().parse_complex_content(&json!(text));
    assert_eq!(sections, vec![section("분석 내용 1", text)]);
}

#[test]
fn paragraphs_use_first_line_as_title() {
    let sections = parser().parse_raw_analysis("Overview\nLine A\nLine B\n\nSecond\nLine C");
    assert_eq!(
        sections,
        vec![
            section("Overview", "Line A\nLine B"),
            section("Second", "Line C"),
        ]
    );
}

#[test]
fn title_that_strips_to_nothing_becomes_placeholder() {
    let sections = parser().parse_complex_content(&json!(42));
    assert_eq!(sections, vec![section("섹션 1", "42")]);
}

#[test]
fn whitespace_text_yields_empty_analysis_section() {
    let sections = parser().parse_complex_content(&json!(" \n\n "));
    assert_eq!(
        sections,
        vec![section(EMPTY_ANALYSIS_TITLE, EMPTY_ANALYSIS_CONTENT)]
    );
}

#[test]
fn raw_analysis_is_found_at_top_level_and_under_analysis() {
    let parser = parser();
    for payload in [
        json!({ "rawAnalysis": "## A\nalpha\n## B\nbeta" }),
        json!({ "analysis": { "rawAnalysis": "## A\nalpha\n## B\nbeta" } }),
    ] {
        let sections = parser.parse_complex_content(&payload);
        assert_eq!(sections, vec![section("A", "alpha"), section("B", "beta")]);
    }
}

#[test]
fn embedded_json_string_is_dispatched_again() {
    let payload = json!(r#"{"sections":[{"title":"임베디드","content":"본문"}]}"#);
    let sections = parser().parse_complex_content(&payload);
    assert_eq!(sections, vec![section("임베디드", "본문")]);
}

#[test]
fn other_objects_are_serialized_before_segmenting() {
    let sections = parser().parse_complex_content(&json!({ "market": "large" }));
    assert_eq!(sections.len(), 1);
    assert!(sections[0].content.contains("\"market\": \"large\""));
}

#[test]
fn null_payload_becomes_single_error_section() {
    let sections = parser().parse_complex_content(&Value::Null);
    assert_eq!(
        sections,
        vec![section(ERROR_SECTION_TITLE, "report payload is null")]
    );
}

#[test]
fn non_object_section_entry_discards_all_progress() {
    let payload = json!({
        "sections": [{ "title": "정상", "content": "본문" }, "plain"]
    });
    let sections = parser().parse_complex_content(&payload);
    assert_eq!(
        sections,
        vec![section(ERROR_SECTION_TITLE, "section 2 is not an object")]
    );
}

#[test]
fn deeply_nested_payload_is_rejected() {
    let mut payload = json!("leaf");
    for _ in 0..70 {
        payload = json!([payload]);
    }

    let sections = parser().parse_complex_content(&payload);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, ERROR_SECTION_TITLE);
    assert!(sections[0].content.contains("64"));
}

#[test]
fn payload_shapes_are_classified_in_priority_order() {
    let structured = json!({ "sections": [], "rawAnalysis": "x" });
    let raw = json!({ "rawAnalysis": "x" });
    let text = json!("x");
    let other = json!([1, 2]);

    assert_eq!(AnalysisPayload::classify(&structured).unwrap().kind(), "structured");
    assert_eq!(AnalysisPayload::classify(&raw).unwrap().kind(), "raw_analysis");
    assert_eq!(AnalysisPayload::classify(&text).unwrap().kind(), "text");
    assert_eq!(AnalysisPayload::classify(&other).unwrap().kind(), "other");
    assert!(matches!(
        AnalysisPayload::classify(&Value::Null),
        Err(ReportParseError::NullPayload)
    ));
}

#[test]
fn short_table_blocks_are_returned_unchanged() {
    let content = "| a | b |\n|---|---|";
    assert_eq!(parse_markdown_table(content), content);
    assert_eq!(parse_markdown_table("plain text"), "plain text");
}

#[test]
fn table_html_follows_surrounding_text() {
    let content = "요약 텍스트\n| 항목 | 값 |\n|---|---|\n| 시장 | 크다 |\n끝";
    let html = parse_markdown_table(content);

    assert!(html.starts_with("요약 텍스트\n끝<div class=\"report-table\">"));
    assert!(html.contains("<thead><tr><th>항목</th><th>값</th></tr></thead>"));
    assert!(html.contains("<tr><td>시장</td><td>크다</td></tr>"));
    assert!(!html.contains("---"));
}

#[test]
fn table_without_separator_keeps_second_line_as_row() {
    let table = MarkdownTable::extract("| h1 | h2 |\n| r1 | x |\n| r2 | <y> |")
        .expect("three table lines form a table");

    assert_eq!(table.header, vec!["h1", "h2"]);
    assert_eq!(table.rows.len(), 2);
    assert!(table.to_html().contains("<td>&lt;y&gt;</td>"));
}

fn renderer(report_type: ReportType) -> InlineRenderer {
    InlineRenderer::new(RenderOptions::for_report(report_type)).expect("inline regexes compile")
}

#[test]
fn inline_blocks_group_lists_and_flush_on_switch() {
    let content = "- one item\n- two item\n1. first\n2. second\n---\nplain **bold** text\nab\n* star item";
    let blocks = renderer(ReportType::BusinessInsights).blocks(content);

    assert_eq!(
        blocks,
        vec![
            Block::UnorderedList(vec!["one item".to_string(), "two item".to_string()]),
            Block::OrderedList(vec!["first".to_string(), "second".to_string()]),
            Block::Rule,
            Block::Paragraph("plain <strong>bold</strong> text".to_string()),
            Block::UnorderedList(vec!["star item".to_string()]),
        ]
    );
}

#[test]
fn inline_paragraphs_are_escaped_and_lose_markers() {
    let blocks = renderer(ReportType::BusinessInsights).blocks("### a < b & `c`");
    assert_eq!(blocks, vec![Block::Paragraph("a &lt; b &amp; c".to_string())]);
}

#[test]
fn market_profile_strips_emoji_and_placeholders() {
    let content = "🚀 성장 [출처] 전망";

    assert_eq!(
        renderer(ReportType::MarketAnalysis).blocks(content),
        vec![Block::Paragraph("성장 전망".to_string())]
    );
    assert_eq!(
        renderer(ReportType::BusinessInsights).blocks(content),
        vec![Block::Paragraph(content.to_string())]
    );
}

#[test]
fn market_profile_drops_repeated_lines() {
    let content = "## 핵심 요약\n핵심 요약\n**핵심 요약**";

    assert_eq!(
        renderer(ReportType::MarketAnalysis).blocks(content),
        vec![Block::Paragraph("핵심 요약".to_string())]
    );
    assert_eq!(renderer(ReportType::BusinessInsights).blocks(content).len(), 3);
}

#[test]
fn render_html_prefers_tables() {
    let html = renderer(ReportType::MarketAnalysis)
        .render_html("설명 <b>\n| a | b |\n|---|---|\n| 1 | 2 |");
    assert!(html.starts_with(
        "<div class=\"report-text\">설명 &lt;b&gt;<div class=\"report-table\">"
    ));
    assert!(html.contains("<th>a</th><th>b</th>"));
    assert!(html.ends_with("</table></div></div>"));

    let html = renderer(ReportType::MarketAnalysis).render_html("- item one");
    assert_eq!(
        html,
        "<div class=\"report-content\"><ul><li>item one</li></ul></div>"
    );
}

#[test]
fn rating_families_are_checked_in_order() {
    let ratings = RatingExtractor::new().expect("rating regexes compile");

    assert_eq!(ratings.extract("성장 가능성이 매우 높습니다"), Some(5));
    assert_eq!(ratings.extract("시장 규모는 보통 수준"), Some(3));
    assert_eq!(ratings.extract("Competition is WEAK"), Some(1));
    assert_eq!(ratings.extract("수요는 높음, 위험은 낮음"), Some(5));
    assert_eq!(ratings.extract("highly specialized claims"), None);
    assert_eq!(render_stars(3), "★★★☆☆ 3/5");
}

#[test]
fn themes_follow_keywords_then_position() {
    assert_eq!(classify_theme("시장 규모", 0), SectionTheme::Market);
    assert_eq!(classify_theme("Competitive Landscape", 0), SectionTheme::Competition);
    assert_eq!(classify_theme("기술 위험", 0), SectionTheme::Technology);
    assert_eq!(classify_theme("결론", 0), SectionTheme::Trend);
    assert_eq!(classify_theme("결론", 5), SectionTheme::Market);
    assert_eq!(SectionTheme::Award.as_str(), "award");
}

fn structurer() -> AnalysisStructurer {
    AnalysisStructurer::new().expect("structurer regexes compile")
}

#[test]
fn structurer_reports_empty_input() {
    let analysis = structurer().structure("   ", ReportType::MarketAnalysis);

    assert_eq!(analysis.sections.len(), 1);
    assert_eq!(analysis.sections[0].title, "**분석 오류**");
    assert_eq!(
        analysis.error.as_ref().map(|issue| issue.issue_type.as_str()),
        Some("EMPTY_RESPONSE")
    );
    assert_eq!(analysis.quality_metrics.total_sections, 1);
}

#[test]
fn structurer_splits_on_markdown_and_bold_headers() {
    let text = "# 시장 개요\n시장 규모는 빠르게 성장하고 있습니다.\n\n**경쟁 환경**\n경쟁사는 다섯 곳입니다.";
    let analysis = structurer().structure(text, ReportType::MarketAnalysis);

    assert_eq!(analysis.sections[0], section("**시장 개요**", "시장 규모는 빠르게 성장하고 있습니다."));
    assert_eq!(analysis.sections[1], section("**경쟁 환경**", "경쟁사는 다섯 곳입니다."));
    assert_eq!(analysis.sections[2].title, "**분석 참고사항**");
    assert_eq!(analysis.quality_metrics.total_sections, 3);
    assert_eq!(analysis.report_name, "시장 분석 리포트");
    assert!(analysis.error.is_none());
}

#[test]
fn business_structurer_detects_stages_and_labels() {
    let text = "1단계: 시장 진입\n- 파트너십 구축\n- 매출 30% 성장 목표\n**핵심 전략**:\n가격 경쟁력 확보";
    let analysis = structurer().structure(text, ReportType::BusinessInsights);

    assert_eq!(analysis.sections[0].title, "**1단계: 시장 진입**");
    assert_eq!(
        analysis.sections[0].content,
        "- 파트너십 구축\n- 매출 **30%** 성장 목표"
    );
    assert_eq!(analysis.sections[1], section("**핵심 전략**", "가격 경쟁력 확보"));
    assert_eq!(analysis.report_name, "비즈니스 인사이트 리포트");
}

#[test]
fn business_content_is_normalized() {
    let formatted =
        structurer().format_business_content("**주요 지표**:\n매출 증가\n\n\n\n3. 해외 진출");
    assert_eq!(formatted, "### 주요 지표\n\n매출 증가\n\n3. **해외 진출**");
}

#[test]
fn structurer_falls_back_to_paragraphs() {
    let text = "Market demand is expanding in Asia. Growth is driven by mobile adoption and pricing.\n\nSecond paragraph discusses competition among three large vendors in detail here.";
    let analysis = structurer().structure(text, ReportType::MarketAnalysis);

    let titles = analysis
        .sections
        .iter()
        .map(|section| section.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec![
            "**Market demand is expanding in Asia**",
            "**Second paragraph discusses competition among three...**",
        ]
    );
}

#[test]
fn structurer_groups_sentences_when_nothing_else_applies() {
    let text = "The market for this patent is growing very quickly. Competitors have not yet filed similar claims anywhere. Licensing revenue could become significant within five years. Regulatory risk remains moderate across major regions.";
    let analysis = structurer().structure(text, ReportType::MarketAnalysis);

    assert_eq!(analysis.sections.len(), 2);
    assert_eq!(analysis.sections[0].title, "**분석 내용 1**");
    assert_eq!(analysis.sections[1].title, "**분석 내용 2**");
    assert!(
        analysis.sections[0]
            .content
            .starts_with("The market for this patent is growing very quickly. Competitors")
    );
}

#[test]
fn quality_metrics_round_the_average() {
    let metrics = quality_metrics(&[section("a", "abc"), section("b", "de")]);
    assert_eq!(metrics.total_sections, 2);
    assert_eq!(metrics.total_content_length, 5);
    assert_eq!(metrics.average_content_length, 3);
    assert_eq!(quality_metrics(&[]), QualityMetrics::default());
}

#[test]
fn envelope_payload_is_located() {
    let nested = json!({ "success": true, "data": { "content": { "rawAnalysis": "## A\nx" } } });
    assert_eq!(
        decode_envelope(&nested, Some(200)).unwrap(),
        json!({ "rawAnalysis": "## A\nx" })
    );

    let raw = json!({ "success": true, "data": { "rawAnalysis": "text" } });
    assert_eq!(
        decode_envelope(&raw, None).unwrap(),
        json!({ "rawAnalysis": "text" })
    );

    let flat = json!({ "success": true, "content": "plain" });
    assert_eq!(decode_envelope(&flat, None).unwrap(), json!("plain"));
}

#[test]
fn envelope_failures_are_classified() {
    let quota = decode_envelope(
        &json!({ "error": "QUOTA_ERROR", "message": "한도 초과" }),
        Some(429),
    )
    .unwrap_err();
    assert_eq!(quota.kind, FailureKind::Quota);
    assert_eq!(quota.status, Some(429));
    assert_eq!(quota.to_string(), "한도 초과");

    let timeout = decode_envelope(&json!({ "success": false, "error": "TIMEOUT_ERROR" }), None)
        .unwrap_err();
    assert_eq!(timeout.kind, FailureKind::Timeout);
    assert_eq!(timeout.message, FailureKind::Timeout.description());

    let missing = decode_envelope(&json!({ "success": true }), Some(200)).unwrap_err();
    assert_eq!(missing.kind, FailureKind::General);
    assert_eq!(missing.message, "리포트 데이터를 받지 못했습니다.");
}

#[test]
fn failure_kinds_map_from_status_and_code() {
    assert_eq!(FailureKind::from_status(400), FailureKind::Validation);
    assert_eq!(FailureKind::from_status(401), FailureKind::Authentication);
    assert_eq!(FailureKind::from_status(503), FailureKind::Network);
    assert_eq!(FailureKind::from_status(504), FailureKind::Timeout);
    assert_eq!(FailureKind::from_status(418), FailureKind::General);
    assert_eq!(FailureKind::from_code("model_error"), Some(FailureKind::AiService));
    assert_eq!(FailureKind::from_code("weird"), None);

    let failure = ReportFailure::classify(Some(500), Some("DATABASE_ERROR"), Some("  "));
    assert_eq!(failure.kind, FailureKind::Database);
    assert_eq!(failure.message, FailureKind::Database.description());
    assert!(!failure.kind.tips().is_empty());
}

#[test]
fn empty_sections_are_dropped_except_top_level_headings() {
    let kept = retain_meaningful_sections(vec![
        section("***개요***", ""),
        section("빈 섹션", "  "),
        section("본문", "내용"),
    ]);
    assert_eq!(kept, vec![section("***개요***", ""), section("본문", "내용")]);

    assert_eq!(
        retain_meaningful_sections(vec![section("빈 섹션", "")]),
        vec![section(EMPTY_ANALYSIS_TITLE, EMPTY_ANALYSIS_CONTENT)]
    );
}

fn html_renderer() -> ReportHtmlRenderer {
    ReportHtmlRenderer::new(RenderOptions::for_report(ReportType::MarketAnalysis))
        .expect("html renderer regexes compile")
}

#[test]
fn meaningless_sections_are_not_renderable() {
    let renderer = html_renderer();
    let body = "시장 규모는 약 100억 달러입니다.";

    assert!(renderer.is_renderable(&section("**시장 규모**", body)));
    assert!(!renderer.is_renderable(&section("1.2", body)));
    assert!(!renderer.is_renderable(&section("undefined", body)));
    assert!(!renderer.is_renderable(&section("A", body)));
    assert!(!renderer.is_renderable(&section("요약", "짧음")));
    assert!(renderer.is_renderable(&section("***시장 개요***", "")));
    assert!(!renderer.is_renderable(&section("******", "")));
}

#[test]
fn rendered_section_carries_theme_and_rating() {
    let html = html_renderer().render_section(
        &section("**시장 규모**", "성장 가능성이 매우 높습니다. 시장은 크다."),
        0,
    );

    assert!(html.contains("data-theme=\"market\""));
    assert!(html.contains("<span class=\"ordinal\">1</span> 시장 규모"));
    assert!(html.contains("data-rating=\"5\""));
    assert!(html.contains("★★★★★ 5/5"));
}

#[test]
fn rendered_document_skips_hidden_sections() {
    let report = ReportData {
        report_type: ReportType::MarketAnalysis,
        report_name: "시장 분석 리포트".to_string(),
        sections: vec![
            section("***개요***", ""),
            section("시장 규모", "시장 규모는 약 100억 달러입니다."),
            section("null", "숨겨져야 하는 섹션 내용입니다."),
        ],
        summary: "A & B".to_string(),
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        source_sha256: String::new(),
    };

    let html = html_renderer().render_document(&report);
    assert_eq!(html.matches("<section").count(), 2);
    assert!(html.contains("<section class=\"report-heading\" data-theme=\"trend\"><h2>개요</h2></section>"));
    assert!(!html.contains("숨겨져야"));
    assert!(html.contains("<html lang=\"ko\">"));
    assert!(html.contains("A &amp; B"));
}

#[test]
fn builder_reads_name_and_summary_from_payload() {
    let builder = ReportBuilder::new().expect("builder regexes compile");
    let payload = json!({
        "reportName": "맞춤 리포트",
        "analysis": {
            "sections": [
                { "title": "A 섹션", "content": "내용" },
                { "title": "빈", "content": "" }
            ],
            "summary": "핵심 요약"
        }
    });

    let report = builder.build(&payload, ReportType::MarketAnalysis);
    assert_eq!(report.report_name, "맞춤 리포트");
    assert_eq!(report.summary, "핵심 요약");
    assert_eq!(report.sections, vec![section("A 섹션", "내용")]);
    assert_eq!(report.source_sha256.len(), 64);
}

#[test]
fn builder_falls_back_to_report_type_defaults() {
    let builder = ReportBuilder::new().expect("builder regexes compile");
    let report = builder.build(&json!({ "rawAnalysis": "## A\nbody" }), ReportType::BusinessInsights);

    assert_eq!(report.report_name, "비즈니스 인사이트 리포트");
    assert_eq!(report.summary, ReportType::BusinessInsights.default_summary());
    assert_eq!(report.sections, vec![section("A", "body")]);

    let failed = builder.build(&Value::Null, ReportType::MarketAnalysis);
    assert_eq!(failed.sections[0].title, ERROR_SECTION_TITLE);
}

#[test]
fn report_type_labels_parse() {
    assert_eq!(ReportType::parse_label("market_analysis"), Some(ReportType::MarketAnalysis));
    assert_eq!(ReportType::parse_label(" Business "), Some(ReportType::BusinessInsights));
    assert_eq!(ReportType::parse_label("legal"), None);
}
