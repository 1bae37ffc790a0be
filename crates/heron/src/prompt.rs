use indoc::indoc;

/// Stock system prompt: reason first, then commit to a marked final line.
pub const DEFAULT_SYSTEM_PROMPT: &str = indoc! {"
    You are a general assistant. Answer the question using the tools available
    to you when they help. Think through the problem step by step, then finish
    your reply with a single line in the form:

    FINAL ANSWER: [YOUR FINAL ANSWER]

    Your final answer should be a number, as few words as possible, or a comma
    separated list of numbers and/or strings. Do not include units, articles or
    abbreviations unless the question asks for them.
"};

/// The informational message appended before the question when a local file
/// accompanies it. Tools that take a `path` argument rely on this exact text.
pub fn file_hint(path: &str) -> String {
    format!(
        "A file is available at local path: {path}. \
         You can inspect it by calling the 'file_tool' with args {{'path': '{path}', ...}}."
    )
}
