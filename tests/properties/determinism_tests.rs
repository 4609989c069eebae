use proptest::prelude::*;

use lfmatch::retrieval::ranker::rank;
use lfmatch::text::tfidf::{TfidfModel, TfidfOptions};
use lfmatch::text::tokenize::{tokenize, NgramRange};

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec("[a-z]{2,8}", 1..10).prop_map(|words| words.join(" ")),
        2..16,
    )
}

fn options() -> TfidfOptions {
    TfidfOptions {
        ngrams: NgramRange::UnigramBigram,
        min_doc_freq: 1,
    }
}

proptest! {
    #[test]
    fn test_tokenize_deterministic(text in ".*") {
        let first = tokenize(&text, NgramRange::UnigramBigram);
        let second = tokenize(&text, NgramRange::UnigramBigram);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_tokens_never_contain_uppercase(text in ".*") {
        for token in tokenize(&text, NgramRange::Unigram) {
            prop_assert!(!token.chars().any(char::is_uppercase));
        }
    }

    #[test]
    fn test_fit_transform_deterministic(corpus in corpus_strategy()) {
        let refs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (_, first) = TfidfModel::fit_transform(&refs, options()).unwrap();
        let (_, second) = TfidfModel::fit_transform(&refs, options()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_document_vectors_are_unit_length(corpus in corpus_strategy()) {
        let refs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (_, vectors) = TfidfModel::fit_transform(&refs, options()).unwrap();
        for vector in &vectors {
            if !vector.is_zero() {
                prop_assert!((vector.l2_norm() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_dot_product_is_symmetric(corpus in corpus_strategy()) {
        let refs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (_, vectors) = TfidfModel::fit_transform(&refs, options()).unwrap();
        for a in &vectors {
            for b in &vectors {
                prop_assert_eq!(a.dot(b), b.dot(a));
            }
        }
    }

    #[test]
    fn test_rank_assigns_dense_ranks_and_sorted_scores(corpus in corpus_strategy()) {
        let refs: Vec<&str> = corpus.iter().map(String::as_str).collect();
        let (model, vectors) = TfidfModel::fit_transform(&refs, options()).unwrap();
        let query = model.transform(&corpus[0]);
        let pool: Vec<usize> = (1..corpus.len()).collect();

        let ranked = rank(&query, &pool, &vectors);
        prop_assert_eq!(ranked.len(), pool.len());
        for (position, candidate) in ranked.iter().enumerate() {
            prop_assert_eq!(candidate.rank, position + 1);
            prop_assert!(candidate.score >= 0.0);
            prop_assert!(candidate.score <= 1.0 + f32::EPSILON);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
