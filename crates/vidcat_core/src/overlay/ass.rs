//! ASS writer for the overlay track.
//!
//! Timing uses the ASS `H:MM:SS.cc` format. The single style renders
//! small red text in the bottom-left corner.

use crate::models::ConcatenationPlan;
use crate::timeline::timecode::format_ass;

/// Script header, styles and event format line.
pub const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
YCbCr Matrix: None
PlayResX: 384
PlayResY: 288

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: style1,Arial,12,&H0000FF,&H0000FF,&H000000,&H000000,0,0,0,0,100,100,0,0,0,0.5,0,1,2,2,2,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Render the overlay track for a plan as ASS text.
pub fn write_overlay_track(plan: &ConcatenationPlan) -> String {
    let mut output = String::from(ASS_HEADER);

    for line in plan.overlay_lines() {
        output.push('\n');
        output.push_str(&format!(
            "Dialogue: 0,{},{},style1,,0,0,0,,{}",
            format_ass(line.start),
            format_ass(line.end),
            line.text
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaInfo, SourceFile};
    use crate::timeline::{build_plan, PlanInput, TimelineAdjuster};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn plan() -> ConcatenationPlan {
        let end = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 2)
            .unwrap();
        let clip = Arc::new(SourceFile::new("/c/a.mp4", Arc::new(MediaInfo::new(1.5)), end));
        build_plan(
            &[PlanInput::from_annotation(clip).unwrap()],
            &TimelineAdjuster::default(),
        )
        .unwrap()
    }

    #[test]
    fn writes_header_then_dialogue_lines() {
        let text = write_overlay_track(&plan());
        assert!(text.starts_with("[Script Info]"));

        let dialogues: Vec<&str> = text.lines().filter(|l| l.starts_with("Dialogue:")).collect();
        assert_eq!(
            dialogues,
            vec![
                "Dialogue: 0,0:00:00.00,0:00:01.00,style1,,0,0,0,,01/06/2024 09:00:00 AM",
                "Dialogue: 0,0:00:01.00,0:00:01.50,style1,,0,0,0,,01/06/2024 09:00:01 AM",
            ]
        );
    }

    #[test]
    fn output_is_deterministic() {
        let plan = plan();
        assert_eq!(write_overlay_track(&plan), write_overlay_track(&plan));
    }
}
