//! Initial database migration.
//!
//! Creates clients and entities, the chart of accounts, dimensions, journal
//! entries with lines and tags, consolidation groups, and attachments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(ENTITIES_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 4: DIMENSIONS
        // ============================================================
        db.execute_unprepared(DIMENSIONS_SQL).await?;

        // ============================================================
        // PART 5: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;
        db.execute_unprepared(LINE_DIMENSION_TAGS_SQL).await?;

        // ============================================================
        // PART 6: CONSOLIDATION
        // ============================================================
        db.execute_unprepared(CONSOLIDATION_SQL).await?;

        // ============================================================
        // PART 7: ATTACHMENTS
        // ============================================================
        db.execute_unprepared(ATTACHMENTS_SQL).await?;

        // ============================================================
        // PART 8: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

CREATE TYPE entry_status AS ENUM (
    'draft',
    'pending_approval',
    'posted',
    'void'
);

CREATE TYPE attachment_type AS ENUM (
    'receipt',
    'invoice',
    'contract',
    'supporting_document',
    'other'
);
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ENTITIES_SQL: &str = r"
CREATE TABLE entities (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_entities_client_code ON entities(client_id, lower(code));
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    subtype VARCHAR(100),
    description TEXT,
    parent_id UUID REFERENCES accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE UNIQUE INDEX idx_accounts_client_code ON accounts(client_id, lower(code));
CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const DIMENSIONS_SQL: &str = r"
CREATE TABLE dimensions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_dimensions_client_name ON dimensions(client_id, lower(name));

CREATE TABLE dimension_values (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    dimension_id UUID NOT NULL REFERENCES dimensions(id) ON DELETE CASCADE,
    code VARCHAR(50),
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX idx_dimension_values_name ON dimension_values(dimension_id, lower(name));
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    entity_id UUID NOT NULL REFERENCES entities(id),
    entry_date DATE NOT NULL,
    description VARCHAR(500) NOT NULL,
    reference VARCHAR(100),
    is_accrual BOOLEAN NOT NULL DEFAULT false,
    reversal_date DATE,
    status entry_status NOT NULL DEFAULT 'draft',
    reversal_of UUID REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_accrual_reversal CHECK (NOT is_accrual OR reversal_date IS NOT NULL),
    CONSTRAINT chk_reversal_after_entry CHECK (reversal_date IS NULL OR reversal_date >= entry_date)
);

CREATE INDEX idx_je_client_date ON journal_entries(client_id, entry_date);
CREATE INDEX idx_je_entity_status ON journal_entries(entity_id, status);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    entity_code VARCHAR(50) NOT NULL DEFAULT '',
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    memo VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (journal_entry_id, line_no),
    CONSTRAINT chk_one_side CHECK (
        debit >= 0 AND credit >= 0 AND (debit = 0 OR credit = 0)
    )
);

CREATE INDEX idx_jel_entry ON journal_entry_lines(journal_entry_id);
CREATE INDEX idx_jel_account ON journal_entry_lines(account_id);
";

const LINE_DIMENSION_TAGS_SQL: &str = r"
CREATE TABLE line_dimension_tags (
    line_id UUID NOT NULL REFERENCES journal_entry_lines(id) ON DELETE CASCADE,
    dimension_value_id UUID NOT NULL REFERENCES dimension_values(id),
    dimension_id UUID NOT NULL REFERENCES dimensions(id),
    PRIMARY KEY (line_id, dimension_value_id),
    UNIQUE (line_id, dimension_id)
);

CREATE INDEX idx_ldt_value ON line_dimension_tags(dimension_value_id);
";

const CONSOLIDATION_SQL: &str = r"
CREATE TABLE consolidation_groups (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE consolidation_group_members (
    group_id UUID NOT NULL REFERENCES consolidation_groups(id) ON DELETE CASCADE,
    entity_id UUID NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    PRIMARY KEY (group_id, entity_id)
);
";

const ATTACHMENTS_SQL: &str = r"
CREATE TABLE attachments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    entity_id UUID NOT NULL REFERENCES entities(id),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    attachment_type attachment_type NOT NULL DEFAULT 'other',
    file_name VARCHAR(255) NOT NULL,
    file_size BIGINT NOT NULL,
    mime_type VARCHAR(100) NOT NULL,
    storage_provider VARCHAR(20) NOT NULL,
    storage_key VARCHAR(500) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_file_size CHECK (file_size > 0)
);

CREATE INDEX idx_attachments_entry ON attachments(journal_entry_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_entry_balance
-- Posted entries must balance within 0.01
-- ============================================================
CREATE OR REPLACE FUNCTION check_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    total_debit NUMERIC(19, 4);
    total_credit NUMERIC(19, 4);
BEGIN
    IF NEW.status = 'posted' THEN
        SELECT
            COALESCE(SUM(debit), 0),
            COALESCE(SUM(credit), 0)
        INTO total_debit, total_credit
        FROM journal_entry_lines
        WHERE journal_entry_id = NEW.id;

        IF ABS(total_debit - total_credit) >= 0.01 THEN
            RAISE EXCEPTION 'Journal entry is not balanced. Debit: %, Credit: %',
                total_debit, total_credit;
        END IF;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER INSERT OR UPDATE OF status ON journal_entries
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_entry_balance();

-- ============================================================
-- FUNCTION: prevent_posted_line_modification
-- Lines of posted or void entries are immutable
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_line_modification()
RETURNS TRIGGER AS $$
DECLARE
    entry_state entry_status;
BEGIN
    SELECT status INTO entry_state
    FROM journal_entries
    WHERE id = OLD.journal_entry_id;

    IF entry_state IN ('posted', 'void') THEN
        RAISE EXCEPTION 'Cannot modify lines of a % journal entry', entry_state;
    END IF;

    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_mod
BEFORE UPDATE OR DELETE ON journal_entry_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_line_modification();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_prevent_posted_line_mod ON journal_entry_lines;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON journal_entries;
DROP FUNCTION IF EXISTS prevent_posted_line_modification();
DROP FUNCTION IF EXISTS check_entry_balance();

DROP TABLE IF EXISTS attachments CASCADE;
DROP TABLE IF EXISTS consolidation_group_members CASCADE;
DROP TABLE IF EXISTS consolidation_groups CASCADE;
DROP TABLE IF EXISTS line_dimension_tags CASCADE;
DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS dimension_values CASCADE;
DROP TABLE IF EXISTS dimensions CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS entities CASCADE;
DROP TABLE IF EXISTS clients CASCADE;

DROP TYPE IF EXISTS attachment_type;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS account_type;
";
