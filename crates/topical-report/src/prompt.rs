//! Deterministic prompt construction and the sentinel contract.
//!
//! The model is told to answer exactly `No data found for {topic}` when a
//! chunk holds nothing relevant; the aggregation filter matches the stable
//! [`SENTINEL_PREFIX`] so wording drift in the topic never breaks filtering.

/// System message applied to every extraction completion.
pub const SYSTEM_PROMPT: &str = "Extract only the requested data. For structured data requests, \
     return pure data without explanations. Be precise and concise.";

/// Stable prefix of the no-data reply, matched by substring in the filter.
pub const SENTINEL_PREFIX: &str = "No data found";

/// Exact reply the model is instructed to give for an empty chunk.
#[must_use]
pub fn sentinel(topic: &str) -> String {
    format!("No data found for {topic}")
}

/// Per-chunk extraction prompt requesting topic-filtered bullet facts.
#[must_use]
pub fn chunk_prompt(chunk: &str, header: &str, topic: &str) -> String {
    format!(
        "SOURCE: {header}\n\
         \n\
         TEXT: {chunk}\n\
         \n\
         TOPIC: \"{topic}\"\n\
         \n\
         EXTRACT ONLY DATA ABOUT \"{topic}\":\n\
         - Key facts and figures\n\
         - Specific numbers, amounts, dates\n\
         - Names, locations, organizations\n\
         - Relevant metrics and statistics\n\
         - Direct quotes or statements\n\
         \n\
         FORMAT:\n\
         - Use bullet points with \u{2022} symbol\n\
         - Include only factual information\n\
         - No explanatory paragraphs\n\
         - Maximum 10 key points per section\n\
         \n\
         If no data about \"{topic}\" found, respond: \"No data found for {topic}\""
    )
}

/// Prompt requesting a JSON array of flat row objects for tabular export.
#[must_use]
pub fn structured_prompt(aggregated: &str, topic: &str) -> String {
    format!(
        "Extract and analyze data from the following content related to the topic \"{topic}\".\n\
         \n\
         CONTENT TO ANALYZE:\n\
         {aggregated}\n\
         \n\
         INSTRUCTIONS:\n\
         1. Return ONLY a JSON array with structured data related to the topic \"{topic}\"\n\
         2. Each object should have relevant fields like S.No, names, amounts, dates, locations, etc.\n\
         3. Format numbers with proper currency symbols where applicable\n\
         4. Include at least 5-10 records if data is available\n\
         5. Make the data comprehensive and well-structured"
    )
}

/// Analyst prompt for the standalone research report surface.
#[must_use]
pub fn research_prompt(query: &str) -> String {
    format!(
        "You are a senior data analyst and researcher. Analyze this research question and \
         provide professional insights:\n\
         \n\
         RESEARCH QUESTION: \"{query}\"\n\
         \n\
         Please provide a comprehensive analysis following this structure:\n\
         \n\
         HEADLINE: [Write a compelling, data-focused headline that directly answers the \
         question in under 120 characters]\n\
         \n\
         SUMMARY:\n\
         [Provide detailed analysis with the following guidelines:]\n\
         \u{2192} Use professional arrow bullets (\u{2192}) instead of asterisks\n\
         \u{2192} Focus on quantitative insights with specific numbers and percentages\n\
         \u{2192} Include trend analysis and year-over-year comparisons where relevant\n\
         \u{2192} Highlight key findings that directly answer the user's question\n\
         \u{2192} Maintain a professional, analytical tone throughout\n\
         \u{2192} Structure information in clear, digestible paragraphs\n\
         \n\
         IMPORTANT FORMATTING RULES:\n\
         \u{2192} Never use asterisks (*) for bullet points\n\
         \u{2192} Always use arrow symbols (\u{2192}) for professional listing\n\
         \u{2192} Include specific data points, percentages, and metrics\n\
         \u{2192} Focus on actionable insights and concrete findings\n\
         \n\
         Provide factual, well-structured analysis that directly addresses the research \
         question: \"{query}\""
    )
}
