// Fri Oct 16 2026 - Alex

use crate::binary::LibraryFile;
use crate::codec::{Architecture, CodecRegistry};
use crate::config::Config;
use crate::engine::{Analysis, AnalysisRequest, ByteSource};
use crate::pattern::{AobPattern, PatternBuilder};
use crate::signature::{
    OccurrenceRanker, RankedCandidate, SearchComposer, SearchResult, SignatureError, ValueExtractor,
};
use rayon::prelude::*;

/// Runs bytes -> AOB -> values -> ranking -> search for requests against one library.
pub struct SignatureGenerator<'a> {
    library: &'a LibraryFile,
    registry: &'a CodecRegistry,
    architecture: Architecture,
    number_of_bytes: usize,
    max_threads: usize,
    extractor: ValueExtractor,
    composer: SearchComposer,
}

impl<'a> SignatureGenerator<'a> {
    pub fn new(
        library: &'a LibraryFile,
        registry: &'a CodecRegistry,
        config: &Config,
    ) -> Result<Self, SignatureError> {
        let architecture = match config.architecture {
            Some(architecture) => {
                log::info!("Using {} architecture", architecture);
                architecture
            }
            None => library.detect_architecture()?,
        };

        Ok(Self {
            library,
            registry,
            architecture,
            number_of_bytes: config.number_of_bytes,
            max_threads: config.max_threads.max(1),
            extractor: ValueExtractor::with_types(&config.value_types)?,
            composer: SearchComposer::new(config.search_options())?,
        })
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn library(&self) -> &LibraryFile {
        self.library
    }

    pub fn read_bytes<'r>(&self, request: &'r AnalysisRequest) -> Result<&'r [u8], SignatureError>
    where
        'a: 'r,
    {
        match &request.source {
            ByteSource::Offset(offset) => Ok(self.library.read_at(*offset, self.number_of_bytes)?),
            ByteSource::Hex(bytes) => Ok(bytes.as_slice()),
        }
    }

    pub fn generate_aob(&self, request: &AnalysisRequest) -> Result<AobPattern, SignatureError> {
        let bytes = self.read_bytes(request)?;
        let builder = PatternBuilder::new(self.registry, self.architecture);
        Ok(builder.build(bytes)?)
    }

    /// Ranks the values of an existing AOB and composes the search.
    pub fn search_aob(
        &self,
        aob: &AobPattern,
    ) -> Result<(Vec<RankedCandidate>, SearchResult), SignatureError> {
        let candidates = self.extractor.extract(aob)?;
        let ranked = OccurrenceRanker::new(self.library.bytes())
            .with_parallel(self.max_threads > 1)
            .rank(candidates)?;
        let result = self.composer.compose(&ranked)?;
        log::info!("Generated {}: {}", result.kind(), result);
        Ok((ranked, result))
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, SignatureError> {
        log::info!("Analyzing {} in {}", request, self.library.name());

        let aob = self.generate_aob(request)?;
        let aob_matches = if aob.significant_byte_count() == 0 {
            log::warn!("AOB for {} has no static bytes", request);
            0
        } else {
            aob.count_matches(self.library.bytes())
        };
        log::info!("AOB matches {} locations in {}", aob_matches, self.library.name());

        let (candidates, result) = self.search_aob(&aob)?;

        Ok(Analysis {
            label: request.label.clone(),
            architecture: self.architecture,
            library: self.library.name(),
            aob,
            aob_matches,
            candidates,
            result,
        })
    }

    /// Analyzes independent requests in parallel. Results keep request order.
    pub fn analyze_batch<F>(
        &self,
        requests: &[AnalysisRequest],
        on_finished: F,
    ) -> Result<Vec<Result<Analysis, SignatureError>>, SignatureError>
    where
        F: Fn(&AnalysisRequest) + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_threads)
            .build()
            .map_err(|e| SignatureError::InvalidOptions(format!("failed to start worker threads: {}", e)))?;

        log::info!("Analyzing {} requests on {} threads", requests.len(), self.max_threads);

        Ok(pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let analysis = self.analyze(request);
                    if let Err(e) = &analysis {
                        log::debug!("Failed to analyze {}: {}", request, e);
                    }
                    on_finished(request);
                    analysis
                })
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::signature::ValueType;
    use crate::utils::testing::ScriptedCodec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn words(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// mov r0, r1 / add r0, r1, r2 / add r0, r0, #1 / add r0, r0, r1 /
    /// mov r1, r0 / mov r0, #0xff / mov r0, r1 / add r0, r1, r2
    const ARM32_FUNCTION: [u32; 8] = [
        0xE1A00001, 0xE0810002, 0xE2800001, 0xE0800001, 0xE1A01000, 0xE3A000FF, 0xE1A00001,
        0xE0810002,
    ];

    fn arm32_library() -> LibraryFile {
        let mut data = vec![0u8; 64];
        data.extend(words(&ARM32_FUNCTION));
        data.extend([0u8; 32]);
        LibraryFile::from_bytes("libgame.so", data)
    }

    fn arm32_config() -> Config {
        Config::new()
            .with_architecture(Architecture::Arm32)
            .with_offsets(vec![64])
            .with_number_of_bytes(32)
            .with_max_threads(1)
    }

    #[test]
    fn test_arm32_function_end_to_end() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let generator = SignatureGenerator::new(&library, &registry, &arm32_config()).unwrap();

        let analysis = generator.analyze(&AnalysisRequest::at_offset(64)).unwrap();

        let wildcards = analysis
            .aob
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_wildcard())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(wildcards, (8..12).chain(20..24).collect::<Vec<_>>());
        assert_eq!(analysis.aob_matches, 1);

        // the run at 24 repeats the run at 0, so only two values survive
        let values = analysis
            .candidates
            .iter()
            .map(|r| (r.candidate.value_type, r.candidate.offset))
            .collect::<Vec<_>>();
        assert_eq!(values, vec![(ValueType::Qword, 0), (ValueType::Qword, 12)]);
        let candidate_bytes: usize = analysis.candidates.iter().map(|r| r.candidate.width()).sum();
        assert_eq!(candidate_bytes, 16);

        assert_eq!(analysis.candidates[0].candidate.value, 0xE0810002E1A00001);
        assert_eq!(analysis.candidates[0].occurrences, 2);
        assert_eq!(analysis.candidates[1].occurrences, 1);

        match &analysis.result {
            SearchResult::Group(group) => {
                assert_eq!(group.offset, 0);
                assert_eq!(group.range, 13);
                assert_eq!(group.values.len(), 2);
            }
            other => panic!("expected group search, got {}", other),
        }
    }

    #[test]
    fn test_aob_is_deterministic() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let generator = SignatureGenerator::new(&library, &registry, &arm32_config()).unwrap();
        let request = AnalysisRequest::at_offset(64);
        assert_eq!(
            generator.generate_aob(&request).unwrap(),
            generator.generate_aob(&request).unwrap()
        );
    }

    #[test]
    fn test_hex_source_counts_in_library() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let config = arm32_config().with_offsets(Vec::new());
        let generator = SignatureGenerator::new(&library, &registry, &config).unwrap();

        let request = AnalysisRequest::from_hex(words(&ARM32_FUNCTION[..2]));
        let analysis = generator.analyze(&request).unwrap();
        assert_eq!(analysis.aob.wildcard_byte_count(), 0);
        assert_eq!(analysis.candidates.len(), 1);
        // one Qword present twice in the library, under the default threshold
        assert!(matches!(analysis.result, SearchResult::Single(ref s) if s.occurrences == 2));
    }

    #[test]
    fn test_value_missing_from_library_is_fatal() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let generator = SignatureGenerator::new(&library, &registry, &arm32_config()).unwrap();

        // mov r2, r3 never appears in the library
        let request = AnalysisRequest::from_hex(words(&[0xE1A02003]));
        let err = generator.analyze(&request).unwrap_err();
        assert!(matches!(err, SignatureError::ZeroOccurrence { offset: 0, .. }));
    }

    #[test]
    fn test_offset_past_end_of_file() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let generator = SignatureGenerator::new(&library, &registry, &arm32_config()).unwrap();
        let err = generator.analyze(&AnalysisRequest::at_offset(0x10000)).unwrap_err();
        assert!(matches!(err, SignatureError::Binary(_)));
    }

    #[test]
    fn test_fully_dynamic_function() {
        let codec = ScriptedCodec::new(Architecture::Arm64)
            .instruction([0x00, 0x00, 0x00, 0x94], "bl #0x0")
            .instruction([0x00, 0x00, 0x00, 0x14], "b #0x0");
        let registry = CodecRegistry::new().with_codec(Arc::new(codec));
        let library = LibraryFile::from_bytes("lib.so", vec![0x00, 0x00, 0x00, 0x94, 0x00, 0x00, 0x00, 0x14]);
        let config = Config::new()
            .with_architecture(Architecture::Arm64)
            .with_max_threads(1);
        let generator = SignatureGenerator::new(&library, &registry, &config).unwrap();

        let err = generator.analyze(&AnalysisRequest::at_offset(0)).unwrap_err();
        assert!(matches!(err, SignatureError::InsufficientStaticBytes));
    }

    #[test]
    fn test_fully_dynamic_hex_in_large_library() {
        let codec = ScriptedCodec::new(Architecture::Arm64).instruction([0x00, 0x00, 0x00, 0x94], "bl #0x0");
        let registry = CodecRegistry::new().with_codec(Arc::new(codec));
        let library = LibraryFile::from_bytes("lib.so", vec![0x94; 16 << 20]);
        let config = Config::new()
            .with_architecture(Architecture::Arm64)
            .with_max_threads(1);
        let generator = SignatureGenerator::new(&library, &registry, &config).unwrap();

        let request = AnalysisRequest::from_hex(vec![0x00, 0x00, 0x00, 0x94]);
        let aob = generator.generate_aob(&request).unwrap();
        assert_eq!(aob.significant_byte_count(), 0);
        assert_eq!(aob.count_matches(library.bytes()), 0);
        assert!(matches!(
            generator.analyze(&request),
            Err(SignatureError::InsufficientStaticBytes)
        ));
    }

    #[test]
    fn test_wrong_architecture_surfaces_decode_error() {
        let library = LibraryFile::from_bytes("lib.so", 0xF0000000u32.to_le_bytes().to_vec());
        let registry = CodecRegistry::new();
        let config = arm32_config();
        let generator = SignatureGenerator::new(&library, &registry, &config).unwrap();
        let err = generator.analyze(&AnalysisRequest::at_offset(0)).unwrap_err();
        assert!(matches!(err, SignatureError::Codec(CodecError::Decode { .. })));
    }

    #[test]
    fn test_unknown_architecture_without_override() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let config = Config::new().with_offsets(vec![64]);
        assert!(matches!(
            SignatureGenerator::new(&library, &registry, &config),
            Err(SignatureError::Binary(_))
        ));
    }

    #[test]
    fn test_batch_keeps_request_order() {
        let library = arm32_library();
        let registry = CodecRegistry::new();
        let config = arm32_config().with_max_threads(2);
        let generator = SignatureGenerator::new(&library, &registry, &config).unwrap();

        let requests = vec![
            AnalysisRequest::at_offset(64),
            AnalysisRequest::at_offset(0x10000),
            AnalysisRequest::at_offset(64).with_label("again"),
        ];
        let finished = AtomicUsize::new(0);
        let results = generator
            .analyze_batch(&requests, |_| {
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(finished.load(Ordering::SeqCst), 3);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        let again = results[2].as_ref().unwrap();
        assert_eq!(again.label, "again");
        assert_eq!(again.result, results[0].as_ref().unwrap().result);
    }
}
