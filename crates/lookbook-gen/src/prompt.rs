//! Per-mode prompt templates
//!
//! Every mode yields exactly [`TEMPLATE_COUNT`] base prompts in a fixed order.
//! Index `i` of a batch always maps to the same narrative or camera angle.

use lookbook_core::Mode;

/// Number of base templates per mode
pub const TEMPLATE_COUNT: usize = 6;

/// Shot Lab instruction shared by every Shot Lab template
pub const SHOT_LAB_BASE_PROMPT: &str = "Generate a photo based on the uploaded image. The subject and product must maintain perfect consistency. Change the composition and viewpoint, and nothing else.";

const SPOTLIGHT_TEMPLATES: [&str; TEMPLATE_COUNT] = [
    "A professional, hyper-detailed photograph of the exact uploaded product. The product is the main subject and must remain consistent. Style: professional food styling, on a rustic wooden table, with minimalist ceramic plate. Lighting: soft, warm natural light. Do not change the product or core elements.",
    "A clean and modern flat lay photograph of the uploaded product. The item must remain exactly as shown. Style it with curated, high-end accessories (stylish jewelry, leather goods) on a textured marble background. Composition: overhead view. Lighting: soft studio lighting.",
    "An artistic close-up macro shot of the uploaded product, with a very shallow depth of field. The focus is strictly on the product, remaining perfectly consistent. Use bold, contrasting light to emphasize texture. Minimalist and elegant styling.",
    "An elegant product photograph. The product must remain the main subject. Place it on a luxurious surface with dramatic shadows and minimal, aesthetically pleasing props. High-end, dramatic feel. Do not change the core product.",
    "A dynamic product photograph with frozen motion, such as splashes, pouring liquid, or flying particles. The product must remain the same. The lighting is energetic and bold, high-contrast composition. Do not change the product or add new elements.",
    "An overhead flat lay of a product collection. The uploaded product is the centerpiece. Arrange it perfectly with other stylish props (e.g., silk scarves, small leather goods) to create a professional and visually appealing lookbook shot.",
];

/// A Lifestyle template with a model-dependent middle section
struct LifestyleTemplate {
    lead: &'static str,
    with_model: &'static str,
    product_only: &'static str,
    tail: &'static str,
}

impl LifestyleTemplate {
    fn render(&self, model_present: bool) -> String {
        let variant = if model_present {
            self.with_model
        } else {
            self.product_only
        };
        format!("{}{}{}", self.lead, variant, self.tail)
    }
}

const LIFESTYLE_TEMPLATES: [LifestyleTemplate; TEMPLATE_COUNT] = [
    LifestyleTemplate {
        lead: "A hyperrealistic cinematic photo captures a dramatic pause on a dimly lit underground subway platform. ",
        with_model: "The model stands motionless in an elegant long black coat, his gaze locked directly with the camera.",
        product_only: "The product is the sole focus.",
        tail: " A vibrant yellow train rushes past in the background, its movement captured with a slow shutter speed to create a brilliant streak of light. The focus is tack-sharp on the subject/product.",
    },
    LifestyleTemplate {
        lead: "A candid photo of ",
        with_model: "the model sitting on a stone staircase in a relaxed pose",
        product_only: "the product placed on a stone staircase.",
        tail: " They wear a casual white sweatshirt and long wide-leg trousers. The neutral gray stone walls and steps create a minimal, urban backdrop.",
    },
    LifestyleTemplate {
        lead: "Generate a cinematic side shot of the subject crossing a street in a rainy, red-light district. ",
        with_model: "The model's head is facing slightly down, holding an umbrella.",
        product_only: "The product is held slightly blurred by rain.",
        tail: " The scene should have moody lighting, reflections on the wet pavement, and a soft backlight halo for a film still look.",
    },
    LifestyleTemplate {
        lead: "Create a cinematic overhead shot of the subject standing still on a brick city sidewalk, as a motion-blurred crowd rushes past. The image should have moody lighting with a 35mm film look, featuring a shallow depth of field and sharp focus strictly on the subject/product.",
        with_model: "",
        product_only: "",
        tail: "",
    },
    LifestyleTemplate {
        lead: "A hyperrealistic cinematic photograph shows a dramatic pause on a dimly lit underground subway platform. The station's warm, atmospheric lighting casts a moody glow on the scene and the arched tiled ceiling.",
        with_model: "",
        product_only: "",
        tail: "",
    },
    LifestyleTemplate {
        lead: "A photo of the subject walking outdoors on a crisp autumn day, framed by rustic stone walls and scattered leaves. ",
        with_model: "The model has hands casually in pockets.",
        product_only: "The product is placed on a stone wall.",
        tail: " The muted, nostalgic color palette evokes an old European film.",
    },
];

const SHOT_LAB_VARIATIONS: [&str; TEMPLATE_COUNT] = [
    "Change the angle to a **cinematic low-angle shot**, from a wide perspective, to create a powerful and heroic feel.",
    "Change the angle to an **artistic high-angle shot**, looking down at the subject, to create a sense of scale and artistic composition.",
    "Change the pose to a **dynamic, action pose**.",
    "Change the pose to a **relaxed, casual pose** with a thoughtful expression.",
    "Change the angle to an **eye-level shot**, taken from a side or three-quarter angle to add dynamism.",
    "Change the angle to an **extreme close-up shot**, highlighting minute details like condensation, water droplets, or intricate patterns.",
];

/// The six Spotlight templates, verbatim
pub fn spotlight_prompts() -> Vec<String> {
    SPOTLIGHT_TEMPLATES.iter().map(|t| t.to_string()).collect()
}

/// The six Lifestyle templates, each resolved for model presence
pub fn lifestyle_prompts(model_present: bool) -> Vec<String> {
    LIFESTYLE_TEMPLATES
        .iter()
        .map(|t| t.render(model_present))
        .collect()
}

/// Shot Lab base instruction, extended with an optional pose/angle chip
pub fn shot_lab_base(pose_angle: Option<&str>) -> String {
    match pose_angle {
        Some(instruction) => format!(
            "{} Specific instruction: {}",
            SHOT_LAB_BASE_PROMPT, instruction
        ),
        None => SHOT_LAB_BASE_PROMPT.to_string(),
    }
}

/// The six Shot Lab templates, each a composition change on `base_prompt`
pub fn shot_lab_prompts(base_prompt: &str) -> Vec<String> {
    SHOT_LAB_VARIATIONS
        .iter()
        .map(|variation| format!("{}. {}", base_prompt.trim_end_matches('.'), variation))
        .collect()
}

/// Base prompts for a mode. Pure and deterministic.
///
/// `model_present` only affects Lifestyle; `pose_angle` only affects Shot Lab.
pub fn build_prompts(mode: Mode, model_present: bool, pose_angle: Option<&str>) -> Vec<String> {
    match mode {
        Mode::Spotlight => spotlight_prompts(),
        Mode::Lifestyle => lifestyle_prompts(model_present),
        Mode::ShotLab => shot_lab_prompts(&shot_lab_base(pose_angle)),
    }
}
