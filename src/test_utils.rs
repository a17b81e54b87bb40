#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{ExamRequest, QuestionType};

    /// Multiple choice request for `count` questions.
    pub fn exam_request(count: u32) -> ExamRequest {
        ExamRequest::new("Matematika", "SMA Kelas 10", count, QuestionType::MultipleChoice)
    }

    /// Generator reply in the plain text format.
    pub fn multiple_choice_reply() -> String {
        "Pertanyaan 1: 2+2?\nA. 3\nB. 4\nC. 5\nD. 6\nJawaban: B\nPenjelasan: dasar".to_string()
    }

    pub fn essay_reply() -> String {
        [
            "Pertanyaan: Jelaskan proses fotosintesis.",
            "Jawaban: Tumbuhan memakai klorofil untuk mengubah cahaya menjadi energi kimia.",
            "Rubrik: Menyebut klorofil, cahaya matahari, dan glukosa.",
        ]
        .join("\n")
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    pub const MULTIPART_BOUNDARY: &str = "soal-test-boundary";

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }

    /// Builds a `multipart/form-data` body from text fields and an optional
    /// `pdf_file` part given as `(filename, bytes)`.
    pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"pdf_file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn multipart_content_type() -> String {
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, test_helpers::*};
    use crate::{models::domain::QuestionType, services::response_parser::parse_questions};

    #[test]
    fn test_fixtures_exam_request() {
        let request = exam_request(2);
        assert_eq!(request.subject, "Matematika");
        assert_eq!(request.num_questions, 2);
        assert_eq!(request.question_type, QuestionType::MultipleChoice);
    }

    #[test]
    fn test_fixtures_replies_parse() {
        let parsed = parse_questions(&multiple_choice_reply(), QuestionType::MultipleChoice);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "2+2?");

        let parsed = parse_questions(&essay_reply(), QuestionType::Essay);
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_body(&[("subject", "IPA")], Some(("", b"")));
        let text = String::from_utf8(body).unwrap();

        assert!(text.contains("name=\"subject\"\r\n\r\nIPA\r\n"));
        assert!(text.contains("name=\"pdf_file\"; filename=\"\""));
        assert!(text.ends_with(&format!("--{MULTIPART_BOUNDARY}--\r\n")));
    }
}
