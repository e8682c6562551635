use super::*;
use crate::lora::LoraEntry;

fn filled_form(platform: Platform) -> ItemForm {
    let mut form = ItemForm::new();
    form.select_platform(platform);
    form.image = "data:image/png;base64,iVBORw0KGgo=".to_string();
    form.prompt = "cyberpunk alley, rain".to_string();
    form
}

fn lora_strings(item: &CollectionItem) -> Vec<String> {
    item.lora().iter().map(LoraEntry::to_string).collect()
}

#[test]
fn new_form_defaults() {
    let form = ItemForm::new();
    assert_eq!(form.platform, Platform::Gemini);
    assert_eq!(form.model, ModelChoice::Listed("Gemini 2.5 Flash".to_string()));
    assert_eq!(form.sampler, "dpmpp_2m");
    assert_eq!(form.scheduler, "normal");
    assert_eq!(form.cfg, "3.5");
    assert_eq!(form.steps, "30");
    assert!(form.adetailer);
    assert!(!form.upscaler);
    assert!(form.lora.iter().all(String::is_empty));
}

#[test]
fn tensor_lora_slots_are_normalized() {
    let mut form = filled_form(Platform::Tensor);
    form.lora[0] = "abc:1.5".to_string();
    form.lora[1] = String::new();
    form.lora[2] = ":0".to_string();
    form.lora[3] = "xyz:bad".to_string();

    let item = form.submit().unwrap();
    assert_eq!(lora_strings(&item), vec!["abc:1.5", "xyz:0.8"]);
}

#[test]
fn non_tensor_submission_strips_settings() {
    let mut form = filled_form(Platform::Gemini);
    form.lora[0] = "abc:1.5".to_string();
    form.cfg = "12".to_string();
    form.seed = "1234".to_string();
    form.upscaler = true;

    let item = form.submit().unwrap();
    assert_eq!(item.generation, Generation::Gemini);
    assert!(item.lora().is_empty());
    assert!(item.generation.tensor().is_none());
}

#[test]
fn non_tensor_ignores_invalid_tensor_fields() {
    let mut form = filled_form(Platform::Leonardo);
    form.cfg = "lots".to_string();
    form.sampler = "nope".to_string();
    assert!(form.submit().is_ok());
}

#[test]
fn missing_image_is_reported() {
    let mut form = filled_form(Platform::Gemini);
    form.image.clear();
    let err = form.submit().unwrap_err();
    assert_eq!(err, ValidationError::Missing("image"));
    assert_eq!(err.field(), "image");
}

#[test]
fn blank_custom_model_is_reported() {
    let mut form = filled_form(Platform::Tensor);
    form.select_model(CUSTOM_MODEL);
    assert!(form.is_custom_model());
    assert_eq!(form.submit().unwrap_err(), ValidationError::Missing("model"));

    form.use_custom_model("  myMerge_v3 ");
    assert_eq!(form.submit().unwrap().model, "myMerge_v3");
}

#[test]
fn missing_prompt_is_reported() {
    let mut form = filled_form(Platform::Midjourney);
    form.prompt = "   ".to_string();
    assert_eq!(form.submit().unwrap_err(), ValidationError::Missing("prompt"));
}

#[test]
fn tensor_numbers_are_validated() {
    let mut form = filled_form(Platform::Tensor);
    form.cfg = "25".to_string();
    assert_eq!(form.submit().unwrap_err().field(), "cfg");

    form.cfg = "7".to_string();
    form.steps = "0".to_string();
    assert_eq!(form.submit().unwrap_err().field(), "steps");

    form.steps = "40".to_string();
    form.seed = "12ab".to_string();
    assert_eq!(form.submit().unwrap_err().field(), "seed");

    form.seed = " 987654 ".to_string();
    let item = form.submit().unwrap();
    let settings = item.generation.tensor().unwrap();
    assert_eq!(settings.cfg, 7.0);
    assert_eq!(settings.steps, 40);
    assert_eq!(settings.seed, "987654");
}

#[test]
fn unknown_sampler_is_rejected() {
    let mut form = filled_form(Platform::Tensor);
    form.sampler = "euler_b".to_string();
    assert_eq!(form.submit().unwrap_err().field(), "sampler");
}

#[test]
fn tag_text_is_split() {
    let mut form = filled_form(Platform::Piclumen);
    form.tags = TagsInput::Text("night, city ,, neon".to_string());
    assert_eq!(form.submit().unwrap().tags, vec!["night", "city", "neon"]);
}

#[test]
fn select_platform_resets_model() {
    let mut form = ItemForm::new();
    form.use_custom_model("whatever");
    form.select_platform(Platform::Piclumen);
    assert_eq!(
        form.model,
        ModelChoice::Listed("PicLumen Realistic V2".to_string())
    );
}

#[test]
fn lora_halves_edit_independently() {
    let mut form = ItemForm::new();
    form.set_lora_name(0, "detail");
    assert_eq!(form.lora[0], "detail:0.0");
    form.set_lora_strength(0, "1.1");
    assert_eq!(form.lora[0], "detail:1.1");
    form.set_lora_strength(9, "1");
    assert!(form.lora[1..].iter().all(String::is_empty));
}

#[test]
fn reverse_mapping_pads_lora_and_detects_custom_model() {
    let item = CollectionItem {
        id: Some(3),
        image: "data:x".to_string(),
        prompt: "p".to_string(),
        negative_prompt: "blurry".to_string(),
        model: "my_private_merge".to_string(),
        tags: vec!["a".to_string()],
        notes: String::new(),
        generation: Generation::Tensor(TensorSettings {
            cfg: 6.5,
            steps: 28,
            lora: vec![LoraEntry::new("ink", 0.7).unwrap()],
            ..TensorSettings::default()
        }),
    };

    let form = ItemForm::from_item(&item);
    assert_eq!(form.platform, Platform::Tensor);
    assert_eq!(form.model, ModelChoice::Custom("my_private_merge".to_string()));
    assert_eq!(form.lora[0], "ink:0.7");
    assert!(form.lora[1..].iter().all(String::is_empty));
    assert_eq!(form.cfg, "6.5");
    assert_eq!(form.steps, "28");

    let mut again = form.submit().unwrap();
    again.id = item.id;
    assert_eq!(again, item);
}

#[test]
fn listed_model_stays_listed_on_reverse_mapping() {
    let item = filled_form(Platform::Midjourney).submit().unwrap();
    let form = ItemForm::from_item(&item);
    assert_eq!(form.model, ModelChoice::Listed("V7".to_string()));
    assert!(!form.is_custom_model());
}
