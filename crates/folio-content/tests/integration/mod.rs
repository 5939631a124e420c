mod corpus_pipeline;
mod document_toc;
