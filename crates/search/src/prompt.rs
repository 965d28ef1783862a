use outfitter_common::Product;
use outfitter_llm::{no_match_prompt, product_prompt, ChatMessage, SYSTEM_PROMPT};

/// System instruction plus the user instruction for this query
///
/// The query is embedded verbatim. Without a match the model is told
/// explicitly that nothing was found.
pub fn build_messages(query: &str, found: Option<&Product>) -> Vec<ChatMessage> {
    let user = match found {
        Some(product) => product_prompt(
            query,
            &product.name,
            &product.description,
            &product.display_price(),
        ),
        None => no_match_prompt(query),
    };

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}
