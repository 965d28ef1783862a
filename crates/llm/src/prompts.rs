//! Prompt templates for product search responses

/// System instruction shared by every search response
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for an outdoor camping gear store. \
You always reply with a short and funny message. \
You only answer questions about outdoor camping products; for anything else, tell the user \
that you can only help with outdoor camping products. \
If you do not know an answer, you say \"I don't know that.\" \
Do not keep any memory of previous conversations.";

/// User instruction when a product matched the search
pub fn product_prompt(query: &str, name: &str, description: &str, price: &str) -> String {
    format!(
        "The user searched for \"{query}\".\n\
         The product that best matches the search is \"{name}\", described as \"{description}\", \
         with a price of {price}.\n\
         Write a catchy and friendly response to the user's search. \
         The response must include the product name, the product description and the product price."
    )
}

/// User instruction when no product cleared the relevance threshold
pub fn no_match_prompt(query: &str) -> String {
    format!(
        "The user searched for \"{query}\".\n\
         No product in the catalog matches this search.\n\
         Write a short, friendly response telling the user that we could not find a matching \
         product. Do not invent or recommend any product."
    )
}
