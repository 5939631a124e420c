mod json_store;
mod markdown_import;
