//! Bedrock knowledge-base backend.
//!
//! Calls the Bedrock Agent Runtime `RetrieveAndGenerate` operation and maps
//! its response onto [`GenerationResult`].
//! API: https://docs.aws.amazon.com/bedrock/latest/APIReference/API_agent-runtime_RetrieveAndGenerate.html

use crate::client::{Citation, GenerationBackend, GenerationRequest, GenerationResult, Reference};
use crate::filter::{FilterAttribute, FilterNode, FilterValue};
use aws_sdk_bedrockagentruntime::error::{BuildError, DisplayErrorContext};
use aws_sdk_bedrockagentruntime::operation::retrieve_and_generate::{
    RetrieveAndGenerateOutput as SdkOutput,
};
use aws_sdk_bedrockagentruntime::types::{
    self as sdk, KnowledgeBaseRetrievalConfiguration,
    KnowledgeBaseRetrieveAndGenerateConfiguration, KnowledgeBaseVectorSearchConfiguration,
    RetrievalFilter, RetrieveAndGenerateConfiguration, RetrieveAndGenerateInput,
    RetrieveAndGenerateType,
};
use aws_sdk_bedrockagentruntime::Client;
use aws_smithy_types::{Document, Number};
use costbot_core::{AppError, AppResult};

/// Bedrock Agent Runtime backend.
#[derive(Debug, Clone)]
pub struct BedrockBackend {
    client: Client,
}

impl BedrockBackend {
    /// Create a backend from a loaded SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Wrap an existing SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Build the SDK configuration block for `request`.
    fn to_sdk_configuration(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<RetrieveAndGenerateConfiguration> {
        let vector_search = KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(request.number_of_results as i32)
            .set_filter(to_sdk_top_level_filter(request)?)
            .build();

        let retrieval = KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(vector_search)
            .build();

        let knowledge_base = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
            .knowledge_base_id(&request.knowledge_base_id)
            .model_arn(&request.model_arn)
            .retrieval_configuration(retrieval)
            .build()
            .map_err(build_error)?;

        RetrieveAndGenerateConfiguration::builder()
            .r#type(RetrieveAndGenerateType::KnowledgeBase)
            .knowledge_base_configuration(knowledge_base)
            .build()
            .map_err(build_error)
    }
}

fn build_error(err: BuildError) -> AppError {
    AppError::RemoteService(format!("Failed to build request: {}", err))
}

/// The request filter as sent on the wire; `None` leaves retrieval
/// unrestricted.
///
/// The service rejects `orAll` lists with fewer than two members, so a
/// single top-level condition is sent on its own.
fn to_sdk_top_level_filter(request: &GenerationRequest) -> AppResult<Option<RetrievalFilter>> {
    match request.filter.conditions() {
        [] => Ok(None),
        [single] => to_sdk_filter(single).map(Some),
        _ => match request.filter.to_node() {
            Some(node) => to_sdk_filter(&node).map(Some),
            None => Ok(None),
        },
    }
}

fn to_sdk_filter(node: &FilterNode) -> AppResult<RetrievalFilter> {
    Ok(match node {
        FilterNode::Equals(attr) => RetrievalFilter::Equals(to_sdk_attribute(attr)?),
        FilterNode::GreaterThanOrEquals(attr) => {
            RetrievalFilter::GreaterThanOrEquals(to_sdk_attribute(attr)?)
        }
        FilterNode::LessThanOrEquals(attr) => {
            RetrievalFilter::LessThanOrEquals(to_sdk_attribute(attr)?)
        }
        FilterNode::AndAll(nodes) => RetrievalFilter::AndAll(
            nodes.iter().map(to_sdk_filter).collect::<AppResult<Vec<_>>>()?,
        ),
        FilterNode::OrAll(nodes) => RetrievalFilter::OrAll(
            nodes.iter().map(to_sdk_filter).collect::<AppResult<Vec<_>>>()?,
        ),
    })
}

fn to_sdk_attribute(attr: &FilterAttribute) -> AppResult<sdk::FilterAttribute> {
    let value = match &attr.value {
        FilterValue::Text(text) => Document::String(text.clone()),
        FilterValue::Number(n) => Document::Number(Number::Float(*n)),
    };

    sdk::FilterAttribute::builder()
        .key(&attr.key)
        .value(value)
        .build()
        .map_err(build_error)
}

/// SDK accessors are `&str` or `Option<&str>` depending on the service
/// model revision; both normalize here.
fn opt_str<'a>(value: impl Into<Option<&'a str>>) -> Option<&'a str> {
    value.into()
}

/// List accessors get the same treatment as [`opt_str`].
fn opt_slice<'a, T>(value: impl Into<Option<&'a [T]>>) -> &'a [T] {
    value.into().unwrap_or_default()
}

fn convert_reference(reference: &sdk::RetrievedReference) -> Reference {
    let content_text = reference
        .content()
        .and_then(|c| opt_str(c.text()))
        .unwrap_or_default()
        .to_string();

    let source_locator = reference.location().and_then(|location| {
        location
            .s3_location()
            .and_then(|s3| opt_str(s3.uri()))
            .or_else(|| location.web_location().and_then(|web| opt_str(web.url())))
            .map(str::to_string)
    });

    Reference {
        content_text,
        source_locator,
    }
}

fn convert_citation(citation: &sdk::Citation) -> Citation {
    let generated_text = citation
        .generated_response_part()
        .and_then(|part| part.text_response_part())
        .and_then(|text| opt_str(text.text()))
        .unwrap_or_default()
        .to_string();

    Citation {
        generated_text,
        retrieved_references: opt_slice(citation.retrieved_references())
            .iter()
            .map(convert_reference)
            .collect(),
    }
}

fn convert_output(response: &SdkOutput) -> GenerationResult {
    let answer_text = response
        .output()
        .and_then(|output| opt_str(output.text()))
        .unwrap_or_default()
        .to_string();

    GenerationResult {
        answer_text,
        citations: opt_slice(response.citations())
            .iter()
            .map(convert_citation)
            .collect(),
        session_id: opt_str(response.session_id()).map(str::to_string),
    }
}

#[async_trait::async_trait]
impl GenerationBackend for BedrockBackend {
    fn backend_name(&self) -> &str {
        "bedrock"
    }

    async fn retrieve_and_generate(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<GenerationResult> {
        tracing::debug!(
            "RetrieveAndGenerate on knowledge base {} with {}",
            request.knowledge_base_id,
            request.model_arn
        );

        let input = RetrieveAndGenerateInput::builder()
            .text(&request.text)
            .build()
            .map_err(build_error)?;

        let response = self
            .client
            .retrieve_and_generate()
            .input(input)
            .retrieve_and_generate_configuration(self.to_sdk_configuration(request)?)
            .set_session_id(request.session_id.clone())
            .send()
            .await
            .map_err(|e| {
                AppError::RemoteService(format!(
                    "RetrieveAndGenerate failed: {}",
                    DisplayErrorContext(e)
                ))
            })?;

        let result = convert_output(&response);

        tracing::debug!(
            "RetrieveAndGenerate returned {} bytes of answer, session {:?}",
            result.answer_text.len(),
            result.session_id
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{build_filter, FilterExpression};
    use aws_sdk_bedrockagentruntime::types::{
        GeneratedResponsePart, RetrievalResultContent, RetrievalResultLocation,
        RetrievalResultLocationType, RetrievalResultS3Location, RetrievalResultWebLocation,
        TextResponsePart,
    };

    /// Builders return `T` or `Result<T, BuildError>` depending on whether
    /// the shape has required members; unwrap both the same way.
    trait Built<T> {
        fn built(self) -> T;
    }

    impl<T> Built<T> for Result<T, BuildError> {
        fn built(self) -> T {
            self.unwrap()
        }
    }

    macro_rules! built_directly {
        ($($ty:ty),* $(,)?) => {
            $(impl Built<$ty> for $ty {
                fn built(self) -> $ty {
                    self
                }
            })*
        };
    }

    built_directly!(
        sdk::Citation,
        sdk::RetrievedReference,
        sdk::RetrieveAndGenerateOutput,
        GeneratedResponsePart,
        RetrievalResultContent,
        RetrievalResultLocation,
        RetrievalResultS3Location,
        RetrievalResultWebLocation,
        TextResponsePart,
        SdkOutput,
    );

    fn s3_location(uri: &str) -> RetrievalResultLocation {
        RetrievalResultLocation::builder()
            .r#type(RetrievalResultLocationType::S3)
            .s3_location(RetrievalResultS3Location::builder().uri(uri).build().built())
            .build()
            .built()
    }

    fn web_location(url: &str) -> RetrievalResultLocation {
        RetrievalResultLocation::builder()
            .r#type(RetrievalResultLocationType::Web)
            .web_location(RetrievalResultWebLocation::builder().url(url).build().built())
            .build()
            .built()
    }

    fn sdk_reference(
        text: &str,
        location: Option<RetrievalResultLocation>,
    ) -> sdk::RetrievedReference {
        sdk::RetrievedReference::builder()
            .content(RetrievalResultContent::builder().text(text).build().built())
            .set_location(location)
            .build()
            .built()
    }

    fn sdk_citation(
        generated: Option<&str>,
        references: Vec<sdk::RetrievedReference>,
    ) -> sdk::Citation {
        let part = generated.map(|text| {
            GeneratedResponsePart::builder()
                .text_response_part(TextResponsePart::builder().text(text).build().built())
                .build()
                .built()
        });
        sdk::Citation::builder()
            .set_generated_response_part(part)
            .set_retrieved_references(Some(references))
            .build()
            .built()
    }

    fn request(filter: FilterExpression) -> GenerationRequest {
        GenerationRequest {
            text: "q".to_string(),
            knowledge_base_id: "KB1".to_string(),
            model_arn: "arn:aws:bedrock:us-east-1::foundation-model/m".to_string(),
            filter,
            number_of_results: 5,
            session_id: None,
        }
    }

    #[test]
    fn test_empty_filter_is_omitted() {
        let filter = to_sdk_top_level_filter(&request(FilterExpression::empty())).unwrap();
        assert!(filter.is_none());
    }

    #[test]
    fn test_single_condition_sent_without_or_wrapper() {
        let filter =
            to_sdk_top_level_filter(&request(build_filter(false, true, None, None))).unwrap();
        match filter {
            Some(RetrievalFilter::Equals(attr)) => {
                assert_eq!(attr.key(), "content_type");
                assert_eq!(attr.value(), &Document::String("cloudfix_blogpost".to_string()));
            }
            other => panic!("expected a bare equals filter, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_conditions_sent_as_or_all() {
        let filter =
            to_sdk_top_level_filter(&request(build_filter(true, true, Some(10.0), None))).unwrap();
        match filter {
            Some(RetrievalFilter::OrAll(members)) => {
                assert_eq!(members.len(), 3);
                assert!(matches!(members[1], RetrievalFilter::GreaterThanOrEquals(_)));
            }
            other => panic!("expected orAll, got {:?}", other),
        }
    }

    #[test]
    fn test_range_sent_as_and_all() {
        let filter =
            to_sdk_top_level_filter(&request(build_filter(true, false, Some(1.0), Some(4.0))))
                .unwrap();
        match filter {
            Some(RetrievalFilter::AndAll(members)) => {
                assert_eq!(members.len(), 3);
                match &members[2] {
                    RetrievalFilter::LessThanOrEquals(attr) => {
                        assert_eq!(attr.value(), &Document::Number(Number::Float(4.0)));
                    }
                    other => panic!("expected lessThanOrEquals, got {:?}", other),
                }
            }
            other => panic!("expected andAll, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_locations() {
        let s3 = convert_reference(&sdk_reference("a", Some(s3_location("s3://bucket/ep1.txt"))));
        assert_eq!(s3.content_text, "a");
        assert_eq!(s3.source_locator.as_deref(), Some("s3://bucket/ep1.txt"));

        let web = sdk_reference("b", Some(web_location("https://example.com/p")));
        let web = convert_reference(&web);
        assert_eq!(web.source_locator.as_deref(), Some("https://example.com/p"));

        let nowhere = convert_reference(&sdk_reference("c", None));
        assert_eq!(nowhere.content_text, "c");
        assert!(nowhere.source_locator.is_none());
    }

    #[test]
    fn test_citation_keeps_reference_order() {
        let citation = convert_citation(&sdk_citation(
            Some("Archive old snapshots."),
            vec![
                sdk_reference("first", Some(s3_location("s3://b/1.txt"))),
                sdk_reference("second", Some(s3_location("s3://b/2.txt"))),
                sdk_reference("third", None),
            ],
        ));

        assert_eq!(citation.generated_text, "Archive old snapshots.");
        let texts: Vec<&str> = citation
            .retrieved_references
            .iter()
            .map(|r| r.content_text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(citation.primary_locator(), Some("s3://b/1.txt"));
    }

    #[test]
    fn test_citation_without_generated_part() {
        let citation = convert_citation(&sdk_citation(None, Vec::new()));
        assert_eq!(citation.generated_text, "");
        assert!(citation.retrieved_references.is_empty());
    }

    #[test]
    fn test_output_conversion() {
        let response = SdkOutput::builder()
            .session_id("session-7")
            .output(
                sdk::RetrieveAndGenerateOutput::builder()
                    .text("Use gp3 volumes.")
                    .build()
                    .built(),
            )
            .citations(sdk_citation(
                Some("Use gp3 volumes."),
                vec![sdk_reference("[12.5] gp3", Some(s3_location("s3://b/ep9.txt")))],
            ))
            .build()
            .built();

        let result = convert_output(&response);

        assert_eq!(result.answer_text, "Use gp3 volumes.");
        assert_eq!(result.session_id.as_deref(), Some("session-7"));
        assert_eq!(result.citations.len(), 1);
        assert_eq!(result.citations[0].primary_locator(), Some("s3://b/ep9.txt"));
    }
}
