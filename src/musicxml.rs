use crate::score::*;

/// Divisions per quarter note
const DIVISIONS: u32 = 4;

/// Convert a Score to MusicXML format
pub fn to_musicxml(score: &Score) -> String {
    let mut xml = String::new();

    // XML declaration and doctype
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');

    // Root element
    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    // Work info (title)
    if !score.title.is_empty() {
        xml.push_str("  <work>\n");
        xml.push_str(&format!("    <work-title>{}</work-title>\n", escape_xml(&score.title)));
        xml.push_str("  </work>\n");
    }

    // Part list
    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name print-object=\"no\">Piano</part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    // Part with measures
    xml.push_str("  <part id=\"P1\">\n");

    for (i, measure) in score.measures.iter().enumerate() {
        xml.push_str(&measure_to_xml(
            measure,
            i + 1,
            &score.time_signature,
            score.clef,
            i == 0,
        ));
    }

    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    xml
}

fn measure_to_xml(
    measure: &Measure,
    number: usize,
    time_signature: &TimeSignature,
    clef: Clef,
    include_attributes: bool,
) -> String {
    let mut xml = String::new();

    xml.push_str(&format!("    <measure number=\"{}\">\n", number));

    // Divisions, key (C major), time signature and clef on first measure
    if include_attributes {
        let (sign, line) = clef.sign_and_line();
        xml.push_str("      <attributes>\n");
        xml.push_str(&format!("        <divisions>{}</divisions>\n", DIVISIONS));
        xml.push_str("        <key>\n");
        xml.push_str("          <fifths>0</fifths>\n");
        xml.push_str("        </key>\n");
        xml.push_str("        <time>\n");
        xml.push_str(&format!("          <beats>{}</beats>\n", time_signature.beats));
        xml.push_str(&format!(
            "          <beat-type>{}</beat-type>\n",
            time_signature.beat_type
        ));
        xml.push_str("        </time>\n");
        xml.push_str("        <clef>\n");
        xml.push_str(&format!("          <sign>{}</sign>\n", sign));
        xml.push_str(&format!("          <line>{}</line>\n", line));
        xml.push_str("        </clef>\n");
        xml.push_str("      </attributes>\n");
    }

    for element in &measure.elements {
        xml.push_str(&element_to_xml(element));
    }

    xml.push_str("    </measure>\n");
    xml
}

fn element_to_xml(element: &Element) -> String {
    let mut xml = String::new();

    xml.push_str("      <note>\n");

    match element {
        Element::Note(pitch) => {
            xml.push_str("        <pitch>\n");
            xml.push_str(&format!("          <step>{}</step>\n", pitch.step.as_str()));
            xml.push_str(&format!("          <octave>{}</octave>\n", pitch.octave));
            xml.push_str("        </pitch>\n");
        }
        Element::Rest => xml.push_str("        <rest/>\n"),
    }

    xml.push_str(&format!("        <duration>{}</duration>\n", DIVISIONS));
    xml.push_str("        <type>quarter</type>\n");
    xml.push_str("      </note>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
