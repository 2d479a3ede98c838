//! Instruction text sent to the vision backend.
//!
//! The single-image instruction uses a forced-identification protocol (the
//! "identity lock"): the backend must name the subject's species, colors,
//! action and surrounding objects before writing the generation prompt. This
//! prevents the regenerated image from swapping the sketched subject for an
//! unrelated one.
//!
//! Both templates end by demanding prompt text only. That is a contract on
//! the remote call, not something enforceable here; the providers take the
//! response literally.

use crate::catalog::{Mode, Style};

/// Build the instruction text for the chosen mode and style.
///
/// The returned text always contains the style descriptor fragment verbatim
/// and is never empty.
pub fn build_instruction(mode: Mode, style: Style) -> String {
    match mode {
        Mode::SingleImage => format!(
            "ACT AS A FORENSIC ART EXPERT. Look at the sketch extremely carefully.\n\
             \n\
             MANDATORY IDENTIFICATION STEPS:\n\
             1. What exactly is the MAIN CHARACTER? (Is it a Rabbit? A Dog? A Monster?). \
             If it has long ears, it's likely a Rabbit.\n\
             2. What color is it? (White? Blue?).\n\
             3. What is it doing? (Driving a car? Flying?).\n\
             4. What objects are present? (A yellow car? A chick?).\n\
             \n\
             OUTPUT TASK:\n\
             Write a highly detailed image generation prompt in English to re-imagine \
             this scene in {style}.\n\
             \n\
             CRITICAL RULES:\n\
             - You MUST explicitly state the species (e.g., \"A cute white rabbit with long ears\").\n\
             - You MUST describe the action exactly (e.g., \"Driving a small yellow toy car\").\n\
             - Maintain the original composition and colors.\n\
             - Output ONLY the prompt text.",
            style = style.descriptor()
        ),
        Mode::ComicStrip => format!(
            "Analyze this sketch. Write a prompt for a '4-panel comic strip' featuring \
             THIS SPECIFIC character, rendered in {style}. Describe a funny short \
             sequence suitable for kids. Request 'thick black outlines, comic book \
             style, speech bubbles with simple English text'. Ensure the character \
             looks consistent in all panels. Output ONLY the English prompt text.",
            style = style.descriptor()
        ),
    }
}

/// Build the text-only instruction for the best-effort comic-mode story.
pub fn build_story_instruction(descriptive_prompt: &str) -> String {
    format!(
        "Here is the description of a child's comic strip: \"{}\". Write a short, \
         funny 3-4 sentence story for kids matching these panels, in simple English. \
         Output ONLY the story text.",
        descriptive_prompt
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_contains_descriptor_verbatim() {
        for mode in Mode::all() {
            for style in Style::all() {
                let instruction = build_instruction(*mode, *style);
                assert!(!instruction.is_empty());
                assert!(
                    instruction.contains(style.descriptor()),
                    "instruction for {:?}/{:?} must embed the style descriptor",
                    mode,
                    style
                );
            }
        }
    }

    #[test]
    fn test_single_image_identity_lock() {
        let instruction = build_instruction(Mode::SingleImage, Style::PixarFilm);
        assert!(instruction.contains("MANDATORY IDENTIFICATION STEPS"));
        assert!(instruction.contains("MUST explicitly state the species"));
        assert!(instruction.contains("Output ONLY the prompt text."));
    }

    #[test]
    fn test_comic_instruction_constraints() {
        let instruction = build_instruction(Mode::ComicStrip, Style::GhibliAnime);
        assert!(instruction.contains("4-panel comic strip"));
        assert!(instruction.contains("thick black outlines"));
        assert!(instruction.contains("speech bubbles"));
        assert!(instruction.contains("consistent in all panels"));
    }

    #[test]
    fn test_story_instruction_embeds_prompt() {
        let instruction = build_story_instruction("A white rabbit driving a yellow car");
        assert!(instruction.contains("A white rabbit driving a yellow car"));
        assert!(instruction.contains("Output ONLY the story text."));
    }
}
