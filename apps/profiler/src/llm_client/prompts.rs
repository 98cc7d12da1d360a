// Shared prompt fragments.
// Each pipeline that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to every prompt that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    IMPORTANT: Your response must be ONLY valid JSON. \
    Do not include any explanatory text, markdown formatting, or additional commentary.";

/// Tells the model how to report a value it cannot find.
pub const OPEN_INSTRUCTION: &str = "If the information is not present, return: OPEN";

/// Delimiter the model is asked to use between list items.
pub const LIST_DELIMITER_INSTRUCTION: &str = "Separate multiple items with the \"|\" character.";
