use quickcheck::QuickCheck;
use rstest::rstest;

use super::*;
use crate::command::CharacterWidth;
use crate::font::GlyphIndexOutOfRange;

fn font() -> FontTable {
    FontTable::from_glyphs("あいうえおかきくけこ".chars().collect())
}

fn name() -> PlayerName {
    PlayerName::new("木村", "天澤")
}

/// Encodes glyph indices as Sixteen-mode character units, terminated.
fn encode16(indices: &[u16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(indices.len() * 2 + 1);
    for &i in indices {
        bytes.extend_from_slice(&(0x8000 + i).to_be_bytes());
    }
    bytes.push(0xFF);
    bytes
}

#[test]
fn characters_resolve_in_order() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&encode16(&[0, 2, 4])).unwrap();
    assert_eq!(segment.text, "あうお");
    assert!(segment.warnings.is_empty());
}

#[test]
fn thirty_two_mode_reads_four_byte_units() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::ThirtyTwo, &font, &name);
    let segment = decoder
        .decode(&[0x80, 0x00, 0x00, 0x01, 0x80, 0x00, 0x00, 0x03, 0xFF])
        .unwrap();
    assert_eq!(segment.text, "いえ");
}

#[test]
fn set_color_consumes_exact_arity() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    // SetColor, RGB = FF0000, then terminator. The argument bytes must not
    // be reinterpreted as units (0xFF 0x00 would otherwise be a character).
    let segment = decoder.decode(&[0x04, 0xFF, 0x00, 0x00, 0xFF]).unwrap();
    assert_eq!(segment.text, "<#FF0000>");
}

#[test]
fn argument_bytes_are_opaque_even_when_command_shaped() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    // MarginLeft argument 0x00FF would be StringEnd + LineBreak if scanned.
    let segment = decoder.decode(&[0x12, 0x00, 0xFF, 0x80, 0x00, 0xFF]).unwrap();
    assert_eq!(segment.text, "<MarginLeft:255>あ");
}

#[test]
fn lone_terminator_yields_empty_segment() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    // The sentinel is above the character threshold; it must dispatch as a
    // command, not start a character unit.
    let segment = decoder.decode(&[0xFF]).unwrap();
    assert_eq!(segment.text, "");
    assert!(segment.warnings.is_empty());
}

#[test]
fn terminator_near_slice_end_is_not_a_truncated_unit() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::ThirtyTwo, &font, &name);
    // Fewer than unit_len bytes remain at the sentinel; it still terminates.
    let segment = decoder.decode(&[0x80, 0x00, 0x00, 0x01, 0xFF, 0x00]).unwrap();
    assert_eq!(segment.text, "い");
}

#[test]
fn terminator_ends_segment_and_ignores_trailing_bytes() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&[0x80, 0x01, 0xFF, 0x50, 0x50, 0x50]).unwrap();
    assert_eq!(segment.text, "い");
}

#[test]
fn missing_terminator_ends_at_slice_end() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&[0x80, 0x00, 0x80, 0x01]).unwrap();
    assert_eq!(segment.text, "あい");
}

#[test]
fn substitution_emits_name_fields_without_font_lookups() {
    // Empty font table: any glyph resolution would fail, proving the name
    // commands never touch it.
    let font = FontTable::from_glyphs(vec![]);
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&[0x20, 0x21, 0xFF]).unwrap();
    assert_eq!(segment.text, "木村天澤");
}

#[test]
fn unknown_command_byte_is_a_hard_error_with_offset() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let err = decoder.decode(&[0x80, 0x00, 0x50, 0xFF]).unwrap_err();
    assert_eq!(err.offset(), 2);
    assert_eq!(err.kind(), &DecodeErrorKind::UnknownCommandByte { byte: 0x50 });
    assert_eq!(err.to_string(), "unknown command byte 0x50 at offset 0x0002");
}

#[test]
fn extended_only_command_is_unknown_in_sixteen_mode() {
    let font = font();
    let name = name();
    let sixteen = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let thirty_two = ScriptDecoder::new(CharacterWidth::ThirtyTwo, &font, &name);

    // SlowText (0x35) only exists in the extended set.
    let err = sixteen.decode(&[0x35, 0xFF]).unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::UnknownCommandByte { byte: 0x35 });

    let segment = thirty_two.decode(&[0x35, 0xFF]).unwrap();
    assert_eq!(segment.text, "<Slow>");
}

#[test]
fn margin_top_arity_follows_the_width() {
    let font = font();
    let name = name();
    let sixteen = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let thirty_two = ScriptDecoder::new(CharacterWidth::ThirtyTwo, &font, &name);

    let classic = sixteen.decode(&[0x11, 0x07, 0xFF]).unwrap();
    assert_eq!(classic.text, "<MarginTop:7>");

    let extended = thirty_two.decode(&[0x11, 0x01, 0x00, 0xFF]).unwrap();
    assert_eq!(extended.text, "<MarginTop:256>");
}

#[test]
fn glyph_index_out_of_range_reports_offset() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    // Index 0x7001 against a 10-glyph table.
    let err = decoder.decode(&[0x80, 0x00, 0xF0, 0x01, 0xFF]).unwrap_err();
    assert_eq!(err.offset(), 2);
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::GlyphIndexOutOfRange(GlyphIndexOutOfRange {
            index: 0x7001,
            len: 10
        })
    );
}

#[test]
fn argument_overrun_is_reported_not_guessed() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let err = decoder.decode(&[0x04, 0xFF, 0x00]).unwrap_err();
    assert_eq!(err.offset(), 0);
    assert_eq!(
        err.kind(),
        &DecodeErrorKind::ArgumentOverrun {
            name: "SetColor",
            needed: 3,
            remaining: 2
        }
    );
}

#[test]
fn truncated_character_unit_is_an_error() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::ThirtyTwo, &font, &name);
    let err = decoder.decode(&[0x80, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.offset(), 0);
    assert_eq!(err.kind(), &DecodeErrorKind::TruncatedUnit);
}

#[test]
fn balanced_ruby_renders_bracket_pair() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    // RubyBase, base glyph, reading in a ruby span.
    let segment = decoder
        .decode(&[0x09, 0x80, 0x00, 0x0A, 0x80, 0x01, 0x0B, 0xFF])
        .unwrap();
    assert_eq!(segment.text, "<Ruby>あ[い]");
    assert!(!segment.is_malformed());
}

#[test]
fn ruby_left_open_degrades_to_warning() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&[0x80, 0x00, 0x0A, 0x80, 0x01, 0xFF]).unwrap();
    // Base text still emitted.
    assert_eq!(segment.text, "あ[い");
    assert_eq!(
        segment.warnings,
        vec![DecodeWarning::UnbalancedRubyMarker { offset: 2 }]
    );
    assert!(segment.is_malformed());
}

#[test]
fn ruby_end_without_start_degrades_to_warning() {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&[0x80, 0x02, 0x0B, 0xFF]).unwrap();
    assert_eq!(segment.text, "う]");
    assert_eq!(
        segment.warnings,
        vec![DecodeWarning::UnbalancedRubyMarker { offset: 2 }]
    );
}

#[rstest]
#[case(0x00, "\n")]
#[case(0x01, "<Name>")]
#[case(0x02, "<Line>")]
#[case(0x03, "</Line>")]
#[case(0x05, "<Select>")]
#[case(0x18, "<Input>")]
#[case(0x19, "<Auto>")]
fn control_markers_render_fixed_tokens(#[case] code: u8, #[case] token: &str) {
    let font = font();
    let name = name();
    let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);
    let segment = decoder.decode(&[code, 0xFF]).unwrap();
    assert_eq!(segment.text, token);
}

/// Property: a well-formed stream of printable character units decodes to
/// exactly the glyph sequence obtained by resolving each unit directly.
#[test]
fn character_stream_matches_direct_resolution_quickcheck() {
    fn prop(raw: Vec<u16>) -> bool {
        let font = font();
        let name = PlayerName::placeholder();
        let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);

        let indices: Vec<u16> = raw
            .into_iter()
            .map(|i| i % u16::try_from(font.len()).unwrap())
            .collect();
        let decoded = decoder.decode(&encode16(&indices)).unwrap();

        let expected: String = indices
            .iter()
            .map(|&i| font.resolve(usize::from(i)).unwrap())
            .collect();
        decoded.text == expected
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<u16>) -> bool);
}

/// Property: re-encoding a decoded glyph sequence through the font table
/// and decoding again is the identity (the table mapping is idempotent).
#[test]
fn reencode_roundtrip_quickcheck() {
    fn prop(raw: Vec<u16>) -> bool {
        let font = font();
        let name = PlayerName::placeholder();
        let decoder = ScriptDecoder::new(CharacterWidth::Sixteen, &font, &name);

        let indices: Vec<u16> = raw
            .into_iter()
            .map(|i| i % u16::try_from(font.len()).unwrap())
            .collect();
        let first = decoder.decode(&encode16(&indices)).unwrap();

        let reencoded: Vec<u16> = first
            .text
            .chars()
            .map(|g| u16::try_from(font.index_of(g).unwrap()).unwrap())
            .collect();
        let second = decoder.decode(&encode16(&reencoded)).unwrap();
        second.text == first.text
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<u16>) -> bool);
}
