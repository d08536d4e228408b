//! Initial schema for the ledger engine.
//!
//! Creates the enum types, the chart/period/voucher-type reference tables,
//! the journal entry and line tables, the per-type sequence counters, and
//! the legal documents table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS voucher_sequences CASCADE;
DROP TABLE IF EXISTS legal_documents CASCADE;
DROP TABLE IF EXISTS voucher_types CASCADE;
DROP TABLE IF EXISTS fiscal_periods CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS document_status;
DROP TYPE IF EXISTS normal_balance;
",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Enum types
CREATE TYPE normal_balance AS ENUM ('debit', 'credit');
CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'reversed', 'cancelled');
CREATE TYPE document_status AS ENUM ('draft', 'approved', 'cancelled');

-- Chart of accounts (owned by configuration, read by the ledger)
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(32) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    normal_balance normal_balance NOT NULL,
    allows_entries BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_code ON chart_of_accounts(code);

-- Fiscal periods (owned by configuration, read by the ledger)
CREATE TABLE fiscal_periods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(32) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    is_closed BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_period_range CHECK (end_date >= start_date)
);

CREATE INDEX idx_periods_range ON fiscal_periods(start_date, end_date);

-- Voucher types carry the numbering pattern
CREATE TABLE voucher_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(16) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    number_prefix VARCHAR(16) NOT NULL DEFAULT '',
    number_width SMALLINT NOT NULL DEFAULT 6,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- One counter row per voucher type, locked FOR UPDATE on allocation
CREATE TABLE voucher_sequences (
    voucher_type_id UUID PRIMARY KEY REFERENCES voucher_types(id) ON DELETE CASCADE,
    last_number BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sequence_non_negative CHECK (last_number >= 0)
);

-- Legal documents that drive derived vouchers
CREATE TABLE legal_documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    document_type_id UUID NOT NULL,
    document_number VARCHAR(64) NOT NULL,
    status document_status NOT NULL DEFAULT 'draft',
    document_date DATE NOT NULL,
    total_amount NUMERIC(19, 2) NOT NULL DEFAULT 0,
    currency CHAR(3) NOT NULL,
    exchange_rate NUMERIC(19, 6) NOT NULL DEFAULT 1,
    fiscal_period_id UUID NOT NULL REFERENCES fiscal_periods(id),
    cancel_reason TEXT,
    cancelled_by UUID,
    cancelled_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_document_number UNIQUE (document_type_id, document_number)
);

-- Journal entries (vouchers)
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    voucher_type_id UUID NOT NULL REFERENCES voucher_types(id),
    entry_number VARCHAR(64) NOT NULL,
    entry_date DATE NOT NULL,
    reference VARCHAR(255),
    description TEXT NOT NULL,
    currency CHAR(3) NOT NULL,
    exchange_rate NUMERIC(19, 6) NOT NULL DEFAULT 1,
    fiscal_period_id UUID NOT NULL REFERENCES fiscal_periods(id),
    status entry_status NOT NULL DEFAULT 'draft',
    total_debit NUMERIC(19, 2) NOT NULL DEFAULT 0,
    total_credit NUMERIC(19, 2) NOT NULL DEFAULT 0,
    document_type_id UUID,
    document_id UUID REFERENCES legal_documents(id),
    created_by UUID NOT NULL,
    posted_by UUID,
    posted_at TIMESTAMPTZ,
    reversed_by UUID,
    reversed_at TIMESTAMPTZ,
    cancelled_at TIMESTAMPTZ,
    cancel_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_entry_number UNIQUE (voucher_type_id, entry_number)
);

-- One voucher per (document, voucher type) pair
CREATE UNIQUE INDEX uq_entry_document_voucher
    ON journal_entries(document_id, voucher_type_id)
    WHERE document_id IS NOT NULL;

-- Libro Diario ordering and filters
CREATE INDEX idx_entries_date_number ON journal_entries(entry_date, entry_number);
CREATE INDEX idx_entries_status ON journal_entries(status);
CREATE INDEX idx_entries_period ON journal_entries(fiscal_period_id);
CREATE INDEX idx_entries_document ON journal_entries(document_id) WHERE document_id IS NOT NULL;

-- Journal lines, owned by their entry
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    description TEXT,
    debit_amount NUMERIC(19, 2) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(19, 2) NOT NULL DEFAULT 0,
    third_party_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_line_order UNIQUE (entry_id, line_number),
    CONSTRAINT chk_line_amounts CHECK (
        debit_amount >= 0 AND credit_amount >= 0
        AND (debit_amount = 0) <> (credit_amount = 0)
    )
);

CREATE INDEX idx_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_lines_account ON journal_lines(account_id);
CREATE INDEX idx_lines_third_party ON journal_lines(third_party_id) WHERE third_party_id IS NOT NULL;
";
