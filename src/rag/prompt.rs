use crate::search::ScoredPoint;

const ANSWER_TEMPLATE: &str = "You're a course teaching assistant. Answer the QUESTION based on the CONTEXT from the FAQ database.
Use only the facts from the CONTEXT when answering the QUESTION.

    QUESTION: {question}

    CONTEXT:
    {context}";

const RELEVANCY_TEMPLATE: &str = r#"You are an expert evaluator for a Retrieval-Augmented Generation (RAG) system.
Your task is to analyze the relevance of the generated answer to the given question.
Based on the relevance of the generated answer, you will classify it
as "NON_RELEVANT", "PARTLY_RELEVANT", or "RELEVANT".

Here is the data for evaluation:

Question: {question}
Generated Answer: {answer}

Please analyze the content and context of the generated answer in relation to the question
and provide your evaluation in parsable JSON without using code blocks:

{
  "Relevance": "NON_RELEVANT" | "PARTLY_RELEVANT" | "RELEVANT",
  "Explanation": "[Provide a brief explanation for your evaluation]"
}"#;

/// Build the answer-generation prompt from retrieved Q&A records.
pub fn build_prompt(query: &str, results: &[ScoredPoint]) -> String {
    let context: String = results
        .iter()
        .map(|point| {
            format!(
                "question: {}\n answer: {}\n\n",
                point.payload.question, point.payload.answer
            )
        })
        .collect();

    fill_template(ANSWER_TEMPLATE, &[("question", query), ("context", &context)])
        .trim()
        .to_string()
}

/// Build the prompt asking the model to grade an answer's relevance.
pub fn build_relevancy_prompt(question: &str, answer: &str) -> String {
    fill_template(RELEVANCY_TEMPLATE, &[("question", question), ("answer", answer)])
}

/// Substitute `{key}` placeholders in a single pass over the template, so
/// braces inside substituted values are left alone.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        filled.push_str(&rest[..start]);
        rest = &rest[start..];

        for (key, value) in values {
            let inner = &rest[1..];
            if inner.starts_with(key) && inner[key.len()..].starts_with('}') {
                filled.push_str(value);
                rest = &rest[key.len() + 2..];
                continue 'scan;
            }
        }

        filled.push('{');
        rest = &rest[1..];
    }

    filled.push_str(rest);
    filled
}
